use crate::enums::{InteractionType, Orientation, PlayerState};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// World position in tiles - the entity's bottom-left reference point
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: i32,
    pub y: i32,
}

impl WorldPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in tiles. Right and bottom edges are inclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    /// Place a local collision rect into world space. The rect's bottom row
    /// lands on the position's row.
    pub fn anchored_at(&self, position: WorldPosition) -> Self {
        Self {
            x: self.x + position.x,
            y: self.y + position.y - (self.height - 1),
            width: self.width,
            height: self.height,
        }
    }

    /// Overlap test; empty rects never intersect
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        if self.width <= 0 || self.height <= 0 || other.width <= 0 || other.height <= 0 {
            return false;
        }

        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Physics aspect - written by the movement logic, integrated by the
/// physics resolver
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Physical {
    pub collision_rect: BoundingBox,
    pub velocity: Vec2,
    pub gravity_affected: bool,
}

impl Physical {
    pub fn new(collision_rect: BoundingBox, gravity_affected: bool) -> Self {
        Self {
            collision_rect,
            velocity: Vec2::ZERO,
            gravity_affected,
        }
    }
}

/// Player control state - mutated only by the movement state machine
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerControlled {
    pub state: PlayerState,
    pub orientation: Orientation,
    pub is_looking_up: bool,
    pub is_looking_down: bool,
    pub performed_interaction: bool,
}

impl PlayerControlled {
    pub fn facing(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Default::default()
        }
    }
}

/// Sprite frames to render, one per render slot
#[derive(Component, Clone, Debug, Default, PartialEq, Eq)]
pub struct SpriteFrames {
    pub frames_to_render: Vec<usize>,
}

impl SpriteFrames {
    pub fn single(frame: usize) -> Self {
        Self {
            frames_to_render: vec![frame],
        }
    }
}

/// Looping frame range; `end_frame` is inclusive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationSequence {
    pub delay_in_frames: u32,
    pub start_frame: usize,
    pub end_frame: usize,
}

/// Ongoing sprite animation. Removed entirely when nothing animates.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct Animated {
    pub sequences: Vec<AnimationSequence>,
}

/// World object the player can trigger by pressing up while overlapping it
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interactable {
    pub interaction_type: InteractionType,
}

/// Player marker component
#[derive(Component)]
pub struct Player;

/// Input intent for one simulation step, already debounced by the host
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub moving_left: bool,
    pub moving_right: bool,
    pub moving_up: bool,
    pub moving_down: bool,
    pub jumping: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_edges_are_inclusive() {
        let rect = BoundingBox::new(10, 20, 3, 5);
        assert_eq!(rect.left(), 10);
        assert_eq!(rect.right(), 12);
        assert_eq!(rect.top(), 20);
        assert_eq!(rect.bottom(), 24);
    }

    #[test]
    fn test_anchored_at_puts_bottom_on_position_row() {
        let rect = BoundingBox::new(0, 0, 3, 5);
        let world = rect.anchored_at(WorldPosition::new(100, 100));
        assert_eq!(world, BoundingBox::new(100, 96, 3, 5));
        assert_eq!(world.bottom(), 100);
    }

    #[test]
    fn test_intersection() {
        let a = BoundingBox::new(0, 0, 3, 5);
        assert!(a.intersects(&BoundingBox::new(2, 4, 1, 1)));
        assert!(!a.intersects(&BoundingBox::new(3, 0, 2, 2)));
        assert!(!a.intersects(&BoundingBox::new(0, 5, 2, 2)));
        assert!(!a.intersects(&BoundingBox::new(1, 1, 0, 2)));
    }

    #[test]
    fn test_physical_starts_at_rest() {
        let physical = Physical::new(BoundingBox::new(0, 0, 3, 5), true);
        assert_eq!(physical.velocity, Vec2::ZERO);
        assert!(physical.gravity_affected);
    }

    #[test]
    fn test_player_controlled_defaults() {
        let controls = PlayerControlled::facing(Orientation::Right);
        assert_eq!(controls.state, PlayerState::Standing);
        assert_eq!(controls.orientation, Orientation::Right);
        assert!(!controls.performed_interaction);
        assert!(!controls.is_looking_up && !controls.is_looking_down);
    }
}
