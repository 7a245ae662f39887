use serde::{Deserialize, Serialize};

/// Player movement state - exactly one is active at a time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlayerState {
    #[default]
    Standing,
    Walking,
    LookingUp,
    Crouching,
    Airborne,
    ClimbingLadder,
}

/// Which way the player sprite faces
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Left,
    Right,
}

/// Kind of world object the player can interact with by pressing up
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionType {
    Teleporter,
    CardReader,
    KeyHole,
    HintMachine,
}
