//! Bogacki-Shampine 3(2) adaptive solver

use nalgebra::DVector;
use std::collections::VecDeque;

use super::{ExplicitSolver, Solver, SolverError, SolverStepResult};
use crate::utils::constants::{SOL_TOLERANCE_LTE_ABS, SOL_TOLERANCE_LTE_REL};

/// Bogacki-Shampine 3(2) pair adaptive solver
///
/// Four-stage, 3rd order with FSAL (First-Same-As-Last) property.
///
/// The underlying method of MATLAB's `ode23`. The First-Same-As-Last
/// (FSAL) property makes the effective cost three stages per accepted step.
///
/// # Characteristics
/// - Order: 3 (propagating) / 2 (embedded)
/// - Stages: 4 (3 effective with FSAL)
/// - Explicit, adaptive timestep
///
/// # Note
/// The default here: with the guard-sampling ceiling capping the
/// timestep anyway, the cheap embedded estimate beats higher-order
/// pairs on cost per step. Switch to RKDP54 when tighter tolerances
/// are required.
///
/// # References
/// - Bogacki, P., & Shampine, L. F. (1989). "A 3(2) pair of
///   Runge-Kutta formulas". Applied Mathematics Letters, 2(4),
///   321-325.
/// - Shampine, L. F., & Reichelt, M. W. (1997). "The MATLAB ODE
///   Suite". SIAM Journal on Scientific Computing, 18(1), 1-22.
#[derive(Debug, Clone)]
pub struct RKBS32 {
    state: DVector<f64>,
    initial: DVector<f64>,
    history: VecDeque<DVector<f64>>,
    slopes: Vec<DVector<f64>>,
    tol_abs: f64,
    tol_rel: f64,
    beta: f64,
}

impl RKBS32 {
    /// Create a new RKBS32 solver with the given initial state
    ///
    /// # Arguments
    /// * `initial` - Initial state vector
    pub fn new(initial: DVector<f64>) -> Self {
        Self::with_tolerances(initial, SOL_TOLERANCE_LTE_ABS, SOL_TOLERANCE_LTE_REL)
    }

    /// Create a new RKBS32 solver with custom tolerances
    ///
    /// # Arguments
    /// * `initial` - Initial state vector
    /// * `tol_abs` - Absolute error tolerance
    /// * `tol_rel` - Relative error tolerance
    pub fn with_tolerances(initial: DVector<f64>, tol_abs: f64, tol_rel: f64) -> Self {
        let n = initial.len();
        Self {
            state: initial.clone(),
            initial,
            history: VecDeque::with_capacity(2),
            slopes: vec![DVector::zeros(n); 4],
            tol_abs,
            tol_rel,
            beta: 0.9, // Safety factor
        }
    }

    /// Compute error norm and timestep scale factor
    fn error_controller(&self, dt: f64) -> (bool, f64, f64) {
        // Coefficients for local truncation error estimate
        // TR = [-5/72, 1/12, 1/9, -1/8]
        let tr = [-5.0 / 72.0, 1.0 / 12.0, 1.0 / 9.0, -1.0 / 8.0];

        // Compute truncation error slope
        let mut error_slope = DVector::zeros(self.state.len());
        for (i, &coef) in tr.iter().enumerate() {
            error_slope += coef * &self.slopes[i];
        }

        // Compute scaling factors (avoid division by zero)
        let scale = self.state.map(|x| self.tol_abs + self.tol_rel * x.abs());

        // Compute scaled error (element-wise)
        let scaled_error = (dt * &error_slope).component_div(&scale).map(|e| e.abs());

        // Error norm (max norm) with lower bound
        let error_norm = scaled_error.max().max(1e-16);

        // Determine if error is acceptable
        let success = error_norm <= 1.0;

        // Compute timestep scale factor using accuracy order
        // Use minimum of propagating order (3) and embedded order (2)
        let order = 2;
        let mut timestep_scale = self.beta / error_norm.powf(1.0 / (order as f64 + 1.0));

        // Clip rescale factor to reasonable range [0.1, 10.0]
        timestep_scale = timestep_scale.clamp(0.1, 10.0);

        (success, error_norm, timestep_scale)
    }
}

impl Solver for RKBS32 {
    fn state(&self) -> &DVector<f64> {
        &self.state
    }

    fn set_state(&mut self, state: DVector<f64>) {
        self.state = state;
    }

    fn buffer(&mut self) {
        if self.history.len() >= 2 {
            self.history.pop_back();
        }
        self.history.push_front(self.state.clone());
    }

    fn revert(&mut self) -> Result<(), SolverError> {
        self.state = self.history.pop_front().ok_or(SolverError::EmptyHistory)?;
        Ok(())
    }

    fn reset(&mut self) {
        self.state = self.initial.clone();
        self.history.clear();
    }

    fn order(&self) -> usize {
        3
    }

    fn stages(&self) -> usize {
        4
    }

    fn is_adaptive(&self) -> bool {
        true
    }
}

impl ExplicitSolver for RKBS32 {
    fn step<F>(&mut self, mut f: F, t: f64, dt: f64) -> SolverStepResult
    where
        F: FnMut(&DVector<f64>, f64) -> DVector<f64>,
    {
        let x0 = self
            .history
            .front()
            .expect("Must call buffer() before step()")
            .clone();

        // RKBS32 Butcher tableau
        // c (evaluation times) = [0, 1/2, 3/4, 1]
        let c = [0.0, 1.0 / 2.0, 3.0 / 4.0, 1.0];

        // Butcher tableau coefficients (a_ij); the third row is also
        // the propagating b row, so the final stage only feeds the
        // error estimate (FSAL)
        #[rustfmt::skip]
        let a: [&[f64]; 3] = [
            &[1.0/2.0],
            &[0.0, 3.0/4.0],
            &[2.0/9.0, 1.0/3.0, 4.0/9.0],
        ];

        for stage in 0..4 {
            self.slopes[stage] = f(&self.state, t + c[stage] * dt);

            if stage < 3 {
                let mut slope_sum = DVector::zeros(x0.len());
                for (i, &coef) in a[stage].iter().enumerate() {
                    slope_sum += coef * &self.slopes[i];
                }
                self.state = &x0 + dt * slope_sum;
            }
        }

        // Compute error estimate and timestep scale
        let (success, error_norm, scale) = self.error_controller(dt);

        SolverStepResult {
            success,
            error_norm,
            scale: Some(scale),
        }
    }
}
