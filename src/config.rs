use crate::components::BoundingBox;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Movement tuning for the player state machine. Velocities are in tiles
/// per tick, negative y is up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub jump_velocity: f32,
    pub walk_speed: f32,
    pub climb_speed: f32,
    pub ladder_exit_velocity: f32,
    pub acceleration_delay_ticks: u32,
    pub walk_animation_delay: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            jump_velocity: -3.6,
            walk_speed: 1.0,
            climb_speed: 1.0,
            ladder_exit_velocity: 1.0,
            acceleration_delay_ticks: 2,
            walk_animation_delay: 4,
        }
    }
}

/// Camera tuning. Dead zones are relative to the viewport's top-left corner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub viewport_width_tiles: i32,
    pub viewport_height_tiles: i32,
    pub look_scroll_step: i32,
    pub scroll_delay_ticks: u32,
    pub default_dead_zone: BoundingBox,
    pub climbing_dead_zone: BoundingBox,
}

impl Default for CameraTuning {
    fn default() -> Self {
        let width = 32;
        let height = 20;
        Self {
            viewport_width_tiles: width,
            viewport_height_tiles: height,
            look_scroll_step: 2,
            scroll_delay_ticks: 2,
            default_dead_zone: BoundingBox::new(11, 2, width - 23, height - 3),
            climbing_dead_zone: BoundingBox::new(11, 7, width - 23, height - 14),
        }
    }
}

/// All tunables, loaded from JSON or defaulted
#[derive(Resource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerTuning,
    pub camera: CameraTuning,
}

/// Load tuning from a JSON file
pub fn load_config_from_file(path: &str) -> Result<GameConfig, ConfigLoadError> {
    if !Path::new(path).exists() {
        return Err(ConfigLoadError::FileNotFound(path.to_string()));
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| ConfigLoadError::IoError(path.to_string(), e.to_string()))?;

    let config: GameConfig = serde_json::from_str(&contents)
        .map_err(|e| ConfigLoadError::ParseError(path.to_string(), e.to_string()))?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &GameConfig) -> Result<(), ConfigLoadError> {
    if config.player.acceleration_delay_ticks == 0 || config.camera.scroll_delay_ticks == 0 {
        return Err(ConfigLoadError::ValidationError(
            "Tick delays must be at least 1".to_string(),
        ));
    }

    if config.camera.viewport_width_tiles <= 0 || config.camera.viewport_height_tiles <= 0 {
        return Err(ConfigLoadError::ValidationError(
            "Viewport must have positive dimensions".to_string(),
        ));
    }

    for (name, zone) in [
        ("default", &config.camera.default_dead_zone),
        ("climbing", &config.camera.climbing_dead_zone),
    ] {
        if zone.width <= 0 || zone.height <= 0 {
            return Err(ConfigLoadError::ValidationError(format!(
                "The {} dead zone has invalid dimensions",
                name
            )));
        }
    }

    Ok(())
}

/// Config loading errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigLoadError {
    FileNotFound(String),
    IoError(String, String),
    ParseError(String, String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigLoadError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigLoadError::IoError(path, err) => {
                write!(f, "IO error reading config file {}: {}", path, err)
            }
            ConfigLoadError::ParseError(path, err) => {
                write!(f, "Failed to parse config file {}: {}", path, err)
            }
            ConfigLoadError::ValidationError(msg) => write!(f, "Config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigLoadError {}
