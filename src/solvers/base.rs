//! Base solver traits and types

use nalgebra::DVector;
use thiserror::Error;

/// Solver-related errors
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("History buffer is empty")]
    EmptyHistory,
}

/// Result of one macro-step
#[derive(Debug, Clone, Copy)]
pub struct SolverStepResult {
    pub success: bool,
    pub error_norm: f64,
    pub scale: Option<f64>,
}

impl Default for SolverStepResult {
    fn default() -> Self {
        Self {
            success: true,
            error_norm: 0.0,
            scale: None,
        }
    }
}

/// Core solver trait for numerical integration
pub trait Solver: Send + Sync {
    /// Get current state vector
    fn state(&self) -> &DVector<f64>;

    /// Set state vector
    fn set_state(&mut self, state: DVector<f64>);

    /// Buffer current state for potential reversion
    fn buffer(&mut self);

    /// Revert to buffered state
    fn revert(&mut self) -> Result<(), SolverError>;

    /// Reset solver to initial state
    fn reset(&mut self);

    /// Order of the method
    fn order(&self) -> usize;

    /// Number of stages
    fn stages(&self) -> usize;

    /// Is this an adaptive solver?
    fn is_adaptive(&self) -> bool;
}

/// Explicit solver trait
pub trait ExplicitSolver: Solver {
    /// Advance one macro-step of size `dt` from the buffered state
    ///
    /// Runs every stage of the tableau. The right-hand side receives
    /// the absolute stage time `t + c_i * dt`, so time-dependent terms
    /// like an external forcing see the true clock.
    fn step<F>(&mut self, f: F, t: f64, dt: f64) -> SolverStepResult
    where
        F: FnMut(&DVector<f64>, f64) -> DVector<f64>;
}
