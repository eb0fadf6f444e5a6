//! Simulation options

use serde::{Deserialize, Serialize};

use crate::model::SlipState;
use crate::utils::constants::{
    EVT_TOLERANCE, SIM_TIMESTEP, SIM_TIMESTEP_MAX, SIM_TIMESTEP_MIN, SOL_TOLERANCE_LTE_ABS,
    SOL_TOLERANCE_LTE_REL,
};

/// Available integrators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverKind {
    /// Classical RK4 (4th order, fixed step)
    RK4,
    /// Bogacki-Shampine 3(2)
    RKBS32,
    /// Dormand-Prince 5(4)
    RKDP54,
}

impl Default for SolverKind {
    fn default() -> Self {
        SolverKind::RKBS32
    }
}

impl SolverKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolverKind::RK4 => "RK4",
            SolverKind::RKBS32 => "RKBS32",
            SolverKind::RKDP54 => "RKDP54",
        }
    }
}

impl std::fmt::Display for SolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simulation options
///
/// `dt_max` is the ceiling on the internal step, not an output rate:
/// guards are only sampled at step boundaries, so the ceiling bounds
/// how long a short-lived mode can stay unnoticed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimOptions {
    /// Integrator
    pub solver: SolverKind,

    /// Initial timestep
    pub dt: f64,

    /// Minimum timestep; shrinking below it aborts the run
    pub dt_min: f64,

    /// Maximum internal timestep
    pub dt_max: f64,

    /// Absolute tolerance for adaptive stepping
    pub tol_abs: f64,

    /// Relative tolerance for adaptive stepping
    pub tol_rel: f64,

    /// Guard value magnitude below which a crossing is resolved
    pub evt_tolerance: f64,

    /// Mode at the start of the run
    pub initial_state: SlipState,

    /// Velocity at the start of the run
    pub initial_velocity: f64,

    /// Position at the start of the run; must lie within the stops
    pub initial_position: f64,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            solver: SolverKind::default(),
            dt: SIM_TIMESTEP,
            dt_min: SIM_TIMESTEP_MIN,
            dt_max: SIM_TIMESTEP_MAX,
            tol_abs: SOL_TOLERANCE_LTE_ABS,
            tol_rel: SOL_TOLERANCE_LTE_REL,
            evt_tolerance: EVT_TOLERANCE,
            initial_state: SlipState::AtRest,
            initial_velocity: 0.0,
            initial_position: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = SimOptions::default();
        assert_eq!(options.solver, SolverKind::RKBS32);
        assert_eq!(options.dt_max, 0.01);
        assert_eq!(options.initial_state, SlipState::AtRest);
        assert_eq!(options.initial_velocity, 0.0);
        assert_eq!(options.initial_position, 0.0);
    }

    #[test]
    fn test_solver_kind_display() {
        assert_eq!(SolverKind::RK4.to_string(), "RK4");
        assert_eq!(SolverKind::RKDP54.as_str(), "RKDP54");
    }

    #[test]
    fn test_options_serde_round_trip() {
        let options = SimOptions {
            solver: SolverKind::RKDP54,
            initial_state: SlipState::AtLeftStop,
            initial_position: -0.5,
            ..SimOptions::default()
        };

        let json = serde_json::to_string(&options).unwrap();
        let back: SimOptions = serde_json::from_str(&json).unwrap();

        assert_eq!(back.solver, SolverKind::RKDP54);
        assert_eq!(back.initial_state, SlipState::AtLeftStop);
        assert_eq!(back.initial_position, -0.5);
        assert_eq!(back.dt_max, options.dt_max);
    }
}
