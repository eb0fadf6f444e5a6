//! Discrete state of the sliding mass and the continuous state layout

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Index of the velocity component in the continuous state vector
pub const VELOCITY: usize = 0;

/// Index of the position component in the continuous state vector
pub const POSITION: usize = 1;

/// Discrete mode of the mass
///
/// Exactly one mode is active at any time. The mode selects which
/// right-hand side the integrator sees and which guard channels are
/// live. Modes change only through the transition table; the driver
/// threads the active mode through the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlipState {
    /// Pressed against the left stop, held by static friction
    AtLeftStop,
    /// Moving right under kinetic friction
    SlidingRight,
    /// Motionless between the stops, held by static friction
    AtRest,
    /// Moving left under kinetic friction
    SlidingLeft,
    /// Pressed against the right stop, held by static friction
    AtRightStop,
}

impl Default for SlipState {
    fn default() -> Self {
        SlipState::AtRest
    }
}

impl SlipState {
    /// All modes, in a fixed order
    pub const ALL: [SlipState; 5] = [
        SlipState::AtLeftStop,
        SlipState::SlidingRight,
        SlipState::AtRest,
        SlipState::SlidingLeft,
        SlipState::AtRightStop,
    ];

    /// True for the three motionless modes
    pub const fn is_pinned(self) -> bool {
        matches!(
            self,
            SlipState::AtLeftStop | SlipState::AtRest | SlipState::AtRightStop
        )
    }

    /// True for the two sliding modes
    pub const fn is_sliding(self) -> bool {
        !self.is_pinned()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SlipState::AtLeftStop => "AtLeftStop",
            SlipState::SlidingRight => "SlidingRight",
            SlipState::AtRest => "AtRest",
            SlipState::SlidingLeft => "SlidingLeft",
            SlipState::AtRightStop => "AtRightStop",
        }
    }
}

impl std::fmt::Display for SlipState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build a continuous state vector from velocity and position
pub fn pack(velocity: f64, position: f64) -> DVector<f64> {
    let mut y = DVector::zeros(2);
    y[VELOCITY] = velocity;
    y[POSITION] = position;
    y
}
