use crate::enums::InteractionType;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub type TileIndex = u16;

/// Number of stacked tile layers in a map
pub const MAP_LAYERS: usize = 2;

/// Per-tile attribute flags from the tile set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileAttributes {
    pub ladder: bool,
    pub foreground: bool,
    pub animated: bool,
    pub fast_animation: bool,
}

/// Static tile map: two layers of `width * height` tile indices, row-major
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileMap {
    pub width: usize,
    pub height: usize,
    pub layers: [Vec<TileIndex>; MAP_LAYERS],
    #[serde(default)]
    pub attributes: Vec<TileAttributes>,
}

impl TileMap {
    /// Empty map where every tile is index 0
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            layers: [vec![0; width * height], vec![0; width * height]],
            attributes: Vec::new(),
        }
    }

    pub fn tile_at(&self, layer: usize, col: usize, row: usize) -> TileIndex {
        self.layers[layer][row * self.width + col]
    }

    pub fn set_tile_at(&mut self, layer: usize, col: usize, row: usize, tile: TileIndex) {
        self.layers[layer][row * self.width + col] = tile;
    }

    /// Attributes for a tile index; unknown indices have no attributes set
    pub fn attributes(&self, tile: TileIndex) -> TileAttributes {
        self.attributes
            .get(usize::from(tile))
            .copied()
            .unwrap_or_default()
    }

    pub fn is_ladder(&self, tile: TileIndex) -> bool {
        self.attributes(tile).ladder
    }
}

/// Level data structure matching JSON format
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub id: String,
    pub map: TileMap,
    pub player_spawn: SpawnPoint,
    #[serde(default)]
    pub interactables: Vec<InteractableData>,
}

/// Player spawn point
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub facing_right: bool,
}

/// Interactable object placement. `x`/`y` is the bottom-left reference point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractableData {
    #[serde(rename = "type")]
    pub interaction_type: InteractionType,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}
