//! Simulation constants and defaults

/// Default initial timestep
pub const SIM_TIMESTEP: f64 = 0.001;

/// Minimum timestep for adaptive solvers
pub const SIM_TIMESTEP_MIN: f64 = 1e-12;

/// Maximum internal timestep
///
/// Bounds how far the integrator can travel between two guard
/// evaluations, so short-lived discrete states cannot be stepped over.
pub const SIM_TIMESTEP_MAX: f64 = 0.01;

/// Small tolerance for numerical comparisons
pub const TOLERANCE: f64 = 1e-16;

/// Default absolute tolerance for local truncation error
pub const SOL_TOLERANCE_LTE_ABS: f64 = 1e-8;

/// Default relative tolerance for local truncation error
pub const SOL_TOLERANCE_LTE_REL: f64 = 1e-4;

/// Default tolerance for event detection
pub const EVT_TOLERANCE: f64 = 1e-4;

/// Safety factor on the secant step truncation
///
/// A truncated trial lands this fraction short of the estimated
/// crossing, so the accepted step ends on the near side of the guard
/// surface instead of hopping over it.
pub const EVT_TRUNCATION_FACTOR: f64 = 0.9;
