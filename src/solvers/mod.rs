//! Explicit Runge-Kutta integrators
//!
//! Fixed-step RK4 plus two embedded adaptive pairs. All solvers step
//! from a buffered state so the driver can revert rejected trials and
//! re-step toward a detected event.

mod base;
mod rk4;
mod rkbs32;
mod rkdp54;

pub use base::{ExplicitSolver, Solver, SolverError, SolverStepResult};
pub use rk4::RK4;
pub use rkbs32::RKBS32;
pub use rkdp54::RKDP54;
