use crate::components::{BoundingBox, Interactable, Physical, WorldPosition};
use crate::level::{LevelData, MAP_LAYERS};
use crate::plugins::camera::{CenterViewOnPlayer, ScrollOffset};
use crate::plugins::ladder::LadderMap;
use crate::plugins::player::{PlayerBundle, PlayerEntity};
use bevy::prelude::*;
use std::fs;
use std::path::Path;

/// Request to replace the current level with the one stored at `path`
#[derive(Event, Clone, Debug, PartialEq, Eq)]
pub struct LoadLevel {
    pub path: String,
}

/// Id of the level currently in play
#[derive(Resource, Clone, Debug, PartialEq, Eq)]
pub struct CurrentLevel {
    pub level_id: String,
}

/// Marks entities that belong to the loaded level
#[derive(Component)]
pub struct LevelEntity;

/// Plugin for level loading
pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<LoadLevel>()
            .add_event::<CenterViewOnPlayer>()
            .add_systems(PreUpdate, load_level_system);
    }
}

/// Load level from JSON file
pub fn load_level_from_file(path: &str) -> Result<LevelData, LevelLoadError> {
    if !Path::new(path).exists() {
        return Err(LevelLoadError::FileNotFound(path.to_string()));
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| LevelLoadError::IoError(path.to_string(), e.to_string()))?;

    let level_data: LevelData = serde_json::from_str(&contents)
        .map_err(|e| LevelLoadError::ParseError(path.to_string(), e.to_string()))?;

    validate_level_data(&level_data)?;

    Ok(level_data)
}

/// Validate level data for required fields and valid values
fn validate_level_data(level: &LevelData) -> Result<(), LevelLoadError> {
    if level.id.is_empty() {
        return Err(LevelLoadError::ValidationError(
            "Level ID cannot be empty".to_string(),
        ));
    }

    let map = &level.map;
    if map.width == 0 || map.height == 0 {
        return Err(LevelLoadError::ValidationError(
            "Map dimensions must be positive".to_string(),
        ));
    }

    for layer in 0..MAP_LAYERS {
        let tiles = map.layers[layer].len();
        if tiles != map.width * map.height {
            return Err(LevelLoadError::ValidationError(format!(
                "Layer {} has {} tiles, expected {}",
                layer,
                tiles,
                map.width * map.height
            )));
        }
    }

    for (i, interactable) in level.interactables.iter().enumerate() {
        if interactable.width <= 0 || interactable.height <= 0 {
            return Err(LevelLoadError::ValidationError(format!(
                "Interactable {} has invalid dimensions",
                i
            )));
        }
    }

    Ok(())
}

/// Insert the level's map resources and spawn the player and interactables.
/// The ladder map is computed here, once per level.
pub fn spawn_level(commands: &mut Commands, level: &LevelData) -> Entity {
    commands.insert_resource(LadderMap::from_tile_map(&level.map));
    commands.insert_resource(level.map.clone());
    commands.insert_resource(ScrollOffset::default());
    commands.insert_resource(CurrentLevel {
        level_id: level.id.clone(),
    });

    let spawn = level.player_spawn;
    let player = commands
        .spawn((
            PlayerBundle::new(WorldPosition::new(spawn.x, spawn.y), spawn.facing_right),
            LevelEntity,
        ))
        .id();
    commands.insert_resource(PlayerEntity(player));

    for interactable in &level.interactables {
        commands.spawn((
            Interactable {
                interaction_type: interactable.interaction_type,
            },
            WorldPosition::new(interactable.x, interactable.y),
            Physical::new(
                BoundingBox::new(0, 0, interactable.width, interactable.height),
                false,
            ),
            LevelEntity,
        ));
    }

    info!(
        "Spawned level {} ({}x{}, {} interactables)",
        level.id,
        level.map.width,
        level.map.height,
        level.interactables.len()
    );

    player
}

/// Handle load requests: unload the current level, then spawn the new one
fn load_level_system(
    mut commands: Commands,
    mut load_events: EventReader<LoadLevel>,
    mut center_events: EventWriter<CenterViewOnPlayer>,
    level_entities: Query<Entity, With<LevelEntity>>,
) {
    let Some(request) = load_events.read().last() else {
        return;
    };

    match load_level_from_file(&request.path) {
        Ok(level) => {
            for entity in level_entities.iter() {
                commands.entity(entity).despawn();
            }
            spawn_level(&mut commands, &level);
            center_events.send(CenterViewOnPlayer);
        }
        Err(e) => {
            // Keep the current level running
            error!("Failed to load level {}: {}", request.path, e);
        }
    }
}

/// Level loading errors
#[derive(Debug, Clone, PartialEq)]
pub enum LevelLoadError {
    FileNotFound(String),
    IoError(String, String),
    ParseError(String, String),
    ValidationError(String),
}

impl std::fmt::Display for LevelLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelLoadError::FileNotFound(path) => write!(f, "Level file not found: {}", path),
            LevelLoadError::IoError(path, err) => {
                write!(f, "IO error reading level file {}: {}", path, err)
            }
            LevelLoadError::ParseError(path, err) => {
                write!(f, "Failed to parse level file {}: {}", path, err)
            }
            LevelLoadError::ValidationError(msg) => write!(f, "Level validation error: {}", msg),
        }
    }
}

impl std::error::Error for LevelLoadError {}
