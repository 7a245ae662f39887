use crate::components::BoundingBox;
use crate::level::{MAP_LAYERS, TileMap};
use bevy::prelude::*;

/// Per-cell ladder flags, built once from the tile map and read-only after.
#[derive(Resource, Clone, Debug, PartialEq, Eq)]
pub struct LadderMap {
    width: usize,
    height: usize,
    flags: Vec<bool>,
}

impl LadderMap {
    /// A cell is a ladder if the tile on either layer is a ladder tile
    pub fn from_tile_map(map: &TileMap) -> Self {
        let mut flags = Vec::with_capacity(map.width * map.height);
        for row in 0..map.height {
            for col in 0..map.width {
                let is_ladder =
                    (0..MAP_LAYERS).any(|layer| map.is_ladder(map.tile_at(layer, col, row)));
                flags.push(is_ladder);
            }
        }

        Self {
            width: map.width,
            height: map.height,
            flags,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Flag at (col, row); anything outside the map is not a ladder
    pub fn is_ladder_at(&self, col: i32, row: i32) -> bool {
        if col < 0 || row < 0 {
            return false;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return false;
        }
        self.flags[row * self.width + col]
    }

    /// First ladder cell inside `bounds`, scanning rows top to bottom and
    /// each row left to right
    pub fn find_touch_point(&self, bounds: &BoundingBox) -> Option<IVec2> {
        for row in bounds.top()..=bounds.bottom() {
            for col in bounds.left()..=bounds.right() {
                if self.is_ladder_at(col, row) {
                    return Some(IVec2::new(col, row));
                }
            }
        }
        None
    }

    /// Ladder continues in the row just above `bounds`
    pub fn can_climb_up(&self, bounds: &BoundingBox) -> bool {
        self.any_ladder_in_row(bounds, bounds.top() - 1)
    }

    /// Ladder continues in the row just below `bounds`
    pub fn can_climb_down(&self, bounds: &BoundingBox) -> bool {
        self.any_ladder_in_row(bounds, bounds.bottom() + 1)
    }

    fn any_ladder_in_row(&self, bounds: &BoundingBox, row: i32) -> bool {
        (bounds.left()..=bounds.right()).any(|col| self.is_ladder_at(col, row))
    }
}
