pub mod components;
pub mod config;
pub mod enums;
pub mod level;
pub mod plugins;
pub mod timing;

pub use components::*;
pub use enums::*;
