//! The physical model: parameters, modes, forcing, dynamics, guards
//! and the transition table
//!
//! A mass slides along a line under a time-dependent external force,
//! held back by static/kinetic dry friction and confined between two
//! physical stops. The discrete mode machine selects the active
//! dynamics; guards fire transitions when the force, velocity, or
//! position crosses a mode boundary.

pub mod dynamics;
pub mod forcing;
pub mod guards;
pub mod params;
pub mod state;
pub mod transition;

pub use forcing::{Forcing, RampedSine};
pub use guards::{Guard, GUARD_COUNT};
pub use params::{Params, ParamsError};
pub use state::{SlipState, POSITION, VELOCITY};
pub use transition::Transition;
