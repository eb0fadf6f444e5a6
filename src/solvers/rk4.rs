//! Classic 4th-order Runge-Kutta solver (RK4)

use nalgebra::DVector;
use std::collections::VecDeque;

use super::{ExplicitSolver, Solver, SolverError, SolverStepResult};

/// Classic 4th-order Runge-Kutta solver
///
/// The workhorse fixed-step explicit method. Four-stage, 4th order accuracy.
/// Widely used for non-stiff ODEs when high accuracy is needed with a
/// reasonable number of function evaluations.
///
/// # Characteristics
/// - Order: 4
/// - Stages: 4
/// - Explicit, fixed timestep
/// - Not A-stable
///
/// # Note
/// The fixed-step choice when the timestep is dictated from outside, as
/// it is here by the guard-sampling ceiling. Offers excellent
/// accuracy-per-cost for smooth, non-stiff dynamics. For adaptive
/// timestepping, prefer RKBS32 or RKDP54.
///
/// # References
/// - Kutta, W. (1901). "Beitrag zur näherungsweisen Integration totaler
///   Differentialgleichungen". Zeitschrift für Mathematik und Physik, 46, 435-453.
/// - Butcher, J. C. (2016). "Numerical Methods for Ordinary Differential
///   Equations". John Wiley & Sons, 3rd Edition.
#[derive(Debug, Clone)]
pub struct RK4 {
    state: DVector<f64>,
    initial: DVector<f64>,
    history: VecDeque<DVector<f64>>,
    slopes: Vec<DVector<f64>>,
}

impl RK4 {
    /// Create a new RK4 solver with the given initial state
    pub fn new(initial: DVector<f64>) -> Self {
        let n = initial.len();
        Self {
            state: initial.clone(),
            initial,
            history: VecDeque::with_capacity(2),
            slopes: vec![DVector::zeros(n); 4],
        }
    }
}

impl Solver for RK4 {
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
        4
    }

    fn stages(&self) -> usize {
        4
    }

    fn is_adaptive(&self) -> bool {
        false
    }
}

impl ExplicitSolver for RK4 {
    fn step<F>(&mut self, mut f: F, t: f64, dt: f64) -> SolverStepResult
    where
        F: FnMut(&DVector<f64>, f64) -> DVector<f64>,
    {
        let x0 = self
            .history
            .front()
            .expect("Must call buffer() before step()")
            .clone();

        // RK4 Butcher tableau
        // c = [0, 1/2, 1/2, 1]
        // a = [[],
        //      [1/2],
        //      [0, 1/2],
        //      [0, 0, 1]]
        // b = [1/6, 1/3, 1/3, 1/6]

        let c = [0.0, 0.5, 0.5, 1.0];
        let b = [1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0];

        for stage in 0..4 {
            self.slopes[stage] = f(&self.state, t + c[stage] * dt);

            self.state = match stage {
                0 => &x0 + dt * 0.5 * &self.slopes[0],
                1 => &x0 + dt * 0.5 * &self.slopes[1],
                2 => &x0 + dt * &self.slopes[2],
                // Final stage: weighted sum over all slopes
                _ => {
                    &x0 + dt
                        * (b[0] * &self.slopes[0]
                            + b[1] * &self.slopes[1]
                            + b[2] * &self.slopes[2]
                            + b[3] * &self.slopes[3])
                }
            };
        }

        SolverStepResult::default()
    }
}
