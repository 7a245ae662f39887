use crate::components::{
    AnimationSequence, Animated, BoundingBox, Interactable, Physical, Player, PlayerControlled,
    PlayerInput, SpriteFrames, WorldPosition,
};
use crate::config::{GameConfig, PlayerTuning};
use crate::enums::{InteractionType, Orientation, PlayerState};
use crate::plugins::ladder::LadderMap;
use crate::timing::{StepTime, TimeStepper};
use bevy::prelude::*;

// Frame indices into the player sprite sheet. The right-facing frames are a
// mirrored copy of the left-facing half.
pub const STANDING_FRAME: usize = 0;
pub const WALKING_FRAME: usize = 1;
pub const WALK_CYCLE_SPAN: usize = 3;
pub const AIRBORNE_FRAME: usize = 8;
pub const LOOKING_UP_FRAME: usize = 16;
pub const CROUCHING_FRAME: usize = 17;
pub const CLIMBING_FRAME: usize = 36;
pub const RIGHT_FACING_FRAME_OFFSET: usize = 39;

/// Player collision size in tiles
pub const PLAYER_WIDTH: i32 = 3;
pub const PLAYER_HEIGHT: i32 = 5;
pub const PLAYER_CROUCHING_HEIGHT: i32 = 4;

/// Systems that advance the player's movement state each frame
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerMovementSet;

/// The single player entity driven by this plugin
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerEntity(pub Entity);

/// Emitted once per overlapping interactable when the player presses up
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerInteraction {
    pub entity: Entity,
    pub interaction_type: InteractionType,
}

/// Request to put the player back at `position` in a neutral state
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RespawnPlayer {
    pub position: WorldPosition,
}

/// Components a freshly spawned player starts with
#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: Player,
    pub controls: PlayerControlled,
    pub physical: Physical,
    pub sprite: SpriteFrames,
    pub position: WorldPosition,
}

impl PlayerBundle {
    pub fn new(position: WorldPosition, facing_right: bool) -> Self {
        let orientation = if facing_right {
            Orientation::Right
        } else {
            Orientation::Left
        };

        Self {
            player: Player,
            controls: PlayerControlled::facing(orientation),
            physical: Physical::new(standing_collision_rect(), true),
            sprite: SpriteFrames::single(oriented_frame(STANDING_FRAME, orientation)),
            position,
        }
    }
}

/// Interactable snapshot taken at query time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InteractableTarget {
    pub entity: Entity,
    pub interaction_type: InteractionType,
    pub bounds: BoundingBox,
}

/// The player aspects the state machine reads and writes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerBody {
    pub controls: PlayerControlled,
    pub physical: Physical,
    pub position: WorldPosition,
}

/// Sprite frame, animation and collision shape for a state/orientation pair
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Presentation {
    pub frame: usize,
    pub animation: Option<AnimationSequence>,
    pub collision_rect: BoundingBox,
}

/// Result of one movement step
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerStep {
    pub body: PlayerBody,
    pub interactions: Vec<PlayerInteraction>,
    /// Set only when state or orientation changed during the step
    pub presentation: Option<Presentation>,
}

/// Plugin for the player movement state machine
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInput>()
            .init_resource::<StepTime>()
            .init_resource::<GameConfig>()
            .add_event::<PlayerInteraction>()
            .add_event::<RespawnPlayer>()
            .add_systems(
                Update,
                (respawn_player_system, update_player_movement_system)
                    .chain()
                    .in_set(PlayerMovementSet)
                    .run_if(resource_exists::<PlayerEntity>())
                    .run_if(resource_exists::<LadderMap>()),
            );
    }
}

/// Cancel opposing direction pairs so at most one horizontal and one
/// vertical direction remains
pub fn sanitize_input(mut input: PlayerInput) -> PlayerInput {
    if input.moving_left && input.moving_right {
        input.moving_left = false;
        input.moving_right = false;
    }
    if input.moving_up && input.moving_down {
        input.moving_up = false;
        input.moving_down = false;
    }
    input
}

/// Advance the movement state machine by one step.
///
/// The order of the checks below is significant: later rules override the
/// state chosen by earlier ones within the same step.
pub fn step_player(
    body: PlayerBody,
    raw_input: PlayerInput,
    has_ticks: bool,
    ladders: &LadderMap,
    interactables: &[InteractableTarget],
    tuning: &PlayerTuning,
) -> PlayerStep {
    let PlayerBody {
        mut controls,
        mut physical,
        mut position,
    } = body;
    let mut interactions = Vec::new();

    // The latch looks at the raw input, before conflicting pairs cancel out
    if controls.performed_interaction && !raw_input.moving_up {
        controls.performed_interaction = false;
    }

    let input = sanitize_input(raw_input);
    let old_state = controls.state;
    let old_orientation = controls.orientation;
    let mut horizontal_wanted = input.moving_left || input.moving_right;
    let mut vertical_wanted = input.moving_up || input.moving_down;

    let bounds = physical.collision_rect.anchored_at(position);

    if vertical_wanted
        && input.moving_up
        && controls.state != PlayerState::ClimbingLadder
        && let Some(touch_point) = ladders.find_touch_point(&bounds)
    {
        controls.state = PlayerState::ClimbingLadder;

        let orientation_offset = match controls.orientation {
            Orientation::Left => 0,
            Orientation::Right => 1,
        };
        position.x = touch_point.x - orientation_offset;
        physical.gravity_affected = false;
    }

    if controls.state == PlayerState::ClimbingLadder {
        horizontal_wanted = false;
    }

    if horizontal_wanted {
        controls.orientation = if input.moving_left {
            Orientation::Left
        } else {
            Orientation::Right
        };
    }

    if controls.state == PlayerState::Airborne {
        vertical_wanted = false;
    }

    // Crouching and looking up cancel horizontal movement
    if vertical_wanted
        && matches!(
            controls.state,
            PlayerState::LookingUp
                | PlayerState::Crouching
                | PlayerState::Standing
                | PlayerState::Walking
        )
    {
        horizontal_wanted = false;
    }

    if controls.state == PlayerState::ClimbingLadder {
        if input.moving_up {
            physical.velocity.y = if ladders.can_climb_up(&bounds) {
                -tuning.climb_speed
            } else {
                0.0
            };
        } else if input.moving_down {
            if ladders.can_climb_down(&bounds) {
                physical.velocity.y = tuning.climb_speed;
            } else {
                controls.state = PlayerState::Airborne;
                physical.gravity_affected = true;
                physical.velocity.y = tuning.ladder_exit_velocity;
                vertical_wanted = false;
            }
        } else {
            physical.velocity.y = 0.0;
        }
    }

    controls.is_looking_up = false;
    controls.is_looking_down = false;
    if vertical_wanted && controls.state != PlayerState::ClimbingLadder {
        if input.moving_up {
            controls.state = PlayerState::LookingUp;
            controls.is_looking_up = true;

            if !controls.performed_interaction {
                for target in interactables {
                    if target.bounds.intersects(&bounds) {
                        interactions.push(PlayerInteraction {
                            entity: target.entity,
                            interaction_type: target.interaction_type,
                        });
                        controls.performed_interaction = true;
                    }
                }
            }
        } else {
            controls.state = PlayerState::Crouching;
            controls.is_looking_down = true;
        }
    }

    // Fall back to standing and let the horizontal logic pick the next state
    if !vertical_wanted
        && matches!(
            controls.state,
            PlayerState::LookingUp | PlayerState::Crouching
        )
    {
        controls.state = PlayerState::Standing;
    }

    // Stopping is immediate, starting to move waits for the tick gate
    if !horizontal_wanted {
        if controls.state == PlayerState::Walking {
            controls.state = PlayerState::Standing;
        }
        physical.velocity.x = 0.0;
    } else {
        if controls.state == PlayerState::Standing {
            controls.state = PlayerState::Walking;
        }

        if matches!(controls.state, PlayerState::Walking | PlayerState::Airborne) && has_ticks {
            physical.velocity.x = if input.moving_left {
                -tuning.walk_speed
            } else {
                tuning.walk_speed
            };
        }
    }

    // The physics resolver zeroes vertical velocity on ground contact
    if controls.state == PlayerState::Airborne && physical.velocity.y == 0.0 {
        controls.state = PlayerState::Standing;
    }

    if input.jumping && controls.state != PlayerState::Airborne {
        physical.velocity.y = tuning.jump_velocity;
        physical.gravity_affected = true;
        controls.state = PlayerState::Airborne;
    }

    let presentation = (controls.state != old_state || controls.orientation != old_orientation)
        .then(|| presentation_for(controls.state, controls.orientation, tuning));
    if let Some(presentation) = &presentation {
        physical.collision_rect = presentation.collision_rect;
    }

    PlayerStep {
        body: PlayerBody {
            controls,
            physical,
            position,
        },
        interactions,
        presentation,
    }
}

/// Sprite frame, animation and collision rect for a state/orientation pair
pub fn presentation_for(
    state: PlayerState,
    orientation: Orientation,
    tuning: &PlayerTuning,
) -> Presentation {
    let mut collision_rect = standing_collision_rect();
    let mut cycle_span = None;

    let base_frame = match state {
        PlayerState::Standing => STANDING_FRAME,
        PlayerState::Walking => {
            cycle_span = Some(WALK_CYCLE_SPAN);
            WALKING_FRAME
        }
        PlayerState::LookingUp => LOOKING_UP_FRAME,
        PlayerState::Crouching => {
            collision_rect.height = PLAYER_CROUCHING_HEIGHT;
            CROUCHING_FRAME
        }
        PlayerState::Airborne => AIRBORNE_FRAME,
        PlayerState::ClimbingLadder => CLIMBING_FRAME,
    };

    let frame = oriented_frame(base_frame, orientation);
    let animation = cycle_span.map(|span| AnimationSequence {
        delay_in_frames: tuning.walk_animation_delay,
        start_frame: frame,
        end_frame: frame + span,
    });

    Presentation {
        frame,
        animation,
        collision_rect,
    }
}

fn standing_collision_rect() -> BoundingBox {
    BoundingBox::new(0, 0, PLAYER_WIDTH, PLAYER_HEIGHT)
}

fn oriented_frame(base_frame: usize, orientation: Orientation) -> usize {
    match orientation {
        Orientation::Left => base_frame,
        Orientation::Right => base_frame + RIGHT_FACING_FRAME_OFFSET,
    }
}

/// Write sprite frame and animation for a new presentation
fn apply_presentation(
    commands: &mut Commands,
    entity: Entity,
    sprite: &mut SpriteFrames,
    presentation: &Presentation,
) {
    match sprite.frames_to_render.first_mut() {
        Some(frame) => *frame = presentation.frame,
        None => sprite.frames_to_render.push(presentation.frame),
    }

    let mut entity_commands = commands.entity(entity);
    entity_commands.remove::<Animated>();
    if let Some(sequence) = presentation.animation {
        entity_commands.insert(Animated {
            sequences: vec![sequence],
        });
    }
}

/// Run one movement step for the player entity
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
fn update_player_movement_system(
    mut commands: Commands,
    player: Res<PlayerEntity>,
    input: Res<PlayerInput>,
    step_time: Res<StepTime>,
    config: Res<GameConfig>,
    ladders: Res<LadderMap>,
    mut stepper: Local<TimeStepper>,
    mut player_query: Query<
        (
            &mut PlayerControlled,
            &mut Physical,
            &mut SpriteFrames,
            &mut WorldPosition,
        ),
        With<Player>,
    >,
    interactable_query: Query<(Entity, &Interactable, &WorldPosition, &Physical), Without<Player>>,
    mut interaction_events: EventWriter<PlayerInteraction>,
) {
    let tuning = &config.player;
    let has_ticks = stepper.update_and_check(tuning.acceleration_delay_ticks, step_time.ticks);

    let Ok((mut controls, mut physical, mut sprite, mut position)) =
        player_query.get_mut(player.0)
    else {
        panic!(
            "Player entity {:?} must have Player, PlayerControlled, Physical, SpriteFrames and WorldPosition",
            player.0
        );
    };

    let targets: Vec<InteractableTarget> = interactable_query
        .iter()
        .map(|(entity, interactable, target_position, target_physical)| InteractableTarget {
            entity,
            interaction_type: interactable.interaction_type,
            bounds: target_physical.collision_rect.anchored_at(*target_position),
        })
        .collect();

    let body = PlayerBody {
        controls: *controls,
        physical: *physical,
        position: *position,
    };
    let step = step_player(body, *input, has_ticks, &ladders, &targets, tuning);

    if step.body.controls.state != body.controls.state {
        debug!(
            "Player state {:?} -> {:?}",
            body.controls.state, step.body.controls.state
        );
    }

    controls.set_if_neq(step.body.controls);
    physical.set_if_neq(step.body.physical);
    position.set_if_neq(step.body.position);

    if let Some(presentation) = &step.presentation {
        apply_presentation(&mut commands, player.0, &mut sprite, presentation);
    }

    for interaction in step.interactions {
        info!(
            "Player interacted with {:?} ({:?})",
            interaction.entity, interaction.interaction_type
        );
        interaction_events.send(interaction);
    }
}

/// Reset the player at a respawn position
#[allow(clippy::type_complexity)]
fn respawn_player_system(
    mut commands: Commands,
    player: Res<PlayerEntity>,
    config: Res<GameConfig>,
    mut respawn_events: EventReader<RespawnPlayer>,
    mut player_query: Query<
        (
            &mut PlayerControlled,
            &mut Physical,
            &mut SpriteFrames,
            &mut WorldPosition,
        ),
        With<Player>,
    >,
) {
    for event in respawn_events.read() {
        let Ok((mut controls, mut physical, mut sprite, mut position)) =
            player_query.get_mut(player.0)
        else {
            panic!(
                "Player entity {:?} must have Player, PlayerControlled, Physical, SpriteFrames and WorldPosition",
                player.0
            );
        };

        let orientation = controls.orientation;
        let presentation = presentation_for(PlayerState::Standing, orientation, &config.player);

        *position = event.position;
        *controls = PlayerControlled::facing(orientation);
        *physical = Physical::new(presentation.collision_rect, true);
        apply_presentation(&mut commands, player.0, &mut sprite, &presentation);

        info!(
            "Player respawned at ({}, {})",
            event.position.x, event.position.y
        );
    }
}
