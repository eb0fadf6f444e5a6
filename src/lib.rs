//! Stick-slip - hybrid simulation of dry friction between two stops
//!
//! A mass slides on a rough surface under a time-varying external
//! force, pinned by static friction until the force overcomes the
//! breakaway threshold and halted again when it slows to a standstill.
//! Rigid stops bound the travel on both sides; hitting one either
//! captures the mass or bounces it back, scaled by a restitution
//! coefficient.
//!
//! # Architecture
//!
//! The system is a finite state machine layered over ODE integration:
//! - Five discrete modes select the active right-hand side
//! - Eight zero-crossing guards watch for mode transitions, each
//!   clamped to zero outside its governing mode
//! - Adaptive Runge-Kutta stepping with event localization: a step
//!   that straddles a crossing is shrunk toward it before the
//!   transition is applied
//!
//! # Example
//!
//! ```rust,ignore
//! use stickslip::*;
//!
//! let sim = Sim::new(Params::default())?;
//! let trajectory = sim.run(50.0)?;
//!
//! for event in trajectory.events() {
//!     println!("t = {:.4}: {} -> {}", event.t, event.from, event.to);
//! }
//! trajectory.save("stickslip.csv")?;
//! ```

pub mod events;
pub mod model;
pub mod sim;
pub mod solvers;
pub mod utils;

pub use model::{Forcing, Guard, Params, ParamsError, RampedSine, SlipState};
pub use sim::{EventRecord, Sample, Sim, SimError, SimOptions, SolverKind, Trajectory};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::model::{Forcing, Guard, Params, ParamsError, RampedSine, SlipState};
    pub use crate::sim::{EventRecord, Sample, Sim, SimError, SimOptions, SolverKind, Trajectory};
    pub use crate::solvers::*;
}
