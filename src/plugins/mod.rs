pub mod camera;
pub mod ladder;
pub mod level;
pub mod player;

pub use camera::CameraPlugin;
pub use level::LevelPlugin;
pub use player::PlayerPlugin;
