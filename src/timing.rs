use bevy::prelude::*;

/// Game logic tick rate used to convert wall-clock frame time into ticks
pub const TICKS_PER_SECOND: f64 = 15.0;

/// Simulated time elapsed during the current step, in ticks
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct StepTime {
    pub ticks: f64,
}

impl StepTime {
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            ticks: seconds * TICKS_PER_SECOND,
        }
    }
}

impl Default for StepTime {
    fn default() -> Self {
        Self { ticks: 1.0 }
    }
}

/// Tick accumulator gating behavior to every n-th elapsed tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimeStepper {
    elapsed_ticks: f64,
}

impl TimeStepper {
    pub fn elapsed_ticks(&self) -> f64 {
        self.elapsed_ticks
    }

    /// Advance by `dt` ticks and report whether `desired_ticks` whole ticks
    /// have accumulated. On success only the fractional remainder is kept.
    pub fn update_and_check(&mut self, desired_ticks: u32, dt: f64) -> bool {
        self.elapsed_ticks += dt;

        if self.elapsed_ticks >= f64::from(desired_ticks) {
            self.elapsed_ticks = self.elapsed_ticks.fract();
            true
        } else {
            false
        }
    }
}
