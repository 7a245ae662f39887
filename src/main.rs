use bevy::prelude::*;
use tile_platformer::config::load_config_from_file;
use tile_platformer::plugins::level::LoadLevel;
use tile_platformer::plugins::{CameraPlugin, LevelPlugin, PlayerPlugin};
use tile_platformer::timing::StepTime;

const CONFIG_PATH: &str = "config.json";
const FIRST_LEVEL_PATH: &str = "levels/level_01.json";

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(PlayerPlugin)
        .add_plugins(CameraPlugin)
        .add_plugins(LevelPlugin)
        .add_systems(Startup, (load_config, load_first_level).chain())
        .add_systems(PreUpdate, advance_step_time)
        .run();
}

fn load_config(mut commands: Commands) {
    match load_config_from_file(CONFIG_PATH) {
        Ok(config) => {
            info!("Loaded config from {}", CONFIG_PATH);
            commands.insert_resource(config);
        }
        Err(e) => warn!("Using default config: {}", e),
    }
}

fn load_first_level(mut load_events: EventWriter<LoadLevel>) {
    load_events.send(LoadLevel {
        path: FIRST_LEVEL_PATH.to_string(),
    });
}

fn advance_step_time(time: Res<Time>, mut step_time: ResMut<StepTime>) {
    *step_time = StepTime::from_seconds(time.delta_seconds_f64());
}
