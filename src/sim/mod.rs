//! Hybrid simulation driver
//!
//! Advances the continuous state with a Runge-Kutta solver while
//! watching the guard channels of the active mode. A trial step that
//! crosses a guard surface is never accepted: it is shrunk toward the
//! crossing until the step start sits within the event tolerance on
//! the near side, the mode transition is applied to that start state,
//! and integration resumes with the stepsize the error controller had
//! before the truncation. Resolving on the near side keeps the mass
//! from ever coming to rest beyond a stop, where the stop's own guard
//! could no longer fire.

mod options;
mod trajectory;

pub use options::{SimOptions, SolverKind};
pub use trajectory::{EventRecord, Sample, Trajectory};

use log::{debug, info, trace};
use nalgebra::DVector;
use thiserror::Error;

use crate::model::state::pack;
use crate::model::{
    dynamics, guards, transition, Forcing, Guard, Params, ParamsError, RampedSine, SlipState,
    GUARD_COUNT, POSITION, VELOCITY,
};
use crate::events::ZeroCrossingUp;
use crate::solvers::{
    ExplicitSolver, Solver, SolverError, SolverStepResult, RK4, RKBS32, RKDP54,
};
use crate::utils::constants::EVT_TRUNCATION_FACTOR;

/// Simulation-related errors
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Simulation horizon must be positive and finite, got {0}")]
    InvalidHorizon(f64),

    #[error("Initial position {position} lies outside the stops [{left_stop}, {right_stop}]")]
    InitialPositionOutOfRange {
        position: f64,
        left_stop: f64,
        right_stop: f64,
    },

    #[error("Step size collapsed to {dt:e} at t = {t} (minimum is {dt_min:e})")]
    StepSizeCollapsed { t: f64, dt: f64, dt_min: f64 },

    #[error("Invalid parameters: {0}")]
    Params(#[from] ParamsError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}

/// Solver selected at runtime
///
/// Enum dispatch instead of a boxed trait object because
/// [`ExplicitSolver::step`] is generic over the right-hand side.
enum Stepper {
    RK4(RK4),
    RKBS32(RKBS32),
    RKDP54(RKDP54),
}

impl Stepper {
    fn new(kind: SolverKind, initial: DVector<f64>, tol_abs: f64, tol_rel: f64) -> Self {
        match kind {
            SolverKind::RK4 => Stepper::RK4(RK4::new(initial)),
            SolverKind::RKBS32 => {
                Stepper::RKBS32(RKBS32::with_tolerances(initial, tol_abs, tol_rel))
            }
            SolverKind::RKDP54 => {
                Stepper::RKDP54(RKDP54::with_tolerances(initial, tol_abs, tol_rel))
            }
        }
    }

    fn state(&self) -> &DVector<f64> {
        match self {
            Stepper::RK4(solver) => solver.state(),
            Stepper::RKBS32(solver) => solver.state(),
            Stepper::RKDP54(solver) => solver.state(),
        }
    }

    fn set_state(&mut self, state: DVector<f64>) {
        match self {
            Stepper::RK4(solver) => solver.set_state(state),
            Stepper::RKBS32(solver) => solver.set_state(state),
            Stepper::RKDP54(solver) => solver.set_state(state),
        }
    }

    fn buffer(&mut self) {
        match self {
            Stepper::RK4(solver) => solver.buffer(),
            Stepper::RKBS32(solver) => solver.buffer(),
            Stepper::RKDP54(solver) => solver.buffer(),
        }
    }

    fn revert(&mut self) -> Result<(), SolverError> {
        match self {
            Stepper::RK4(solver) => solver.revert(),
            Stepper::RKBS32(solver) => solver.revert(),
            Stepper::RKDP54(solver) => solver.revert(),
        }
    }

    fn step<F>(&mut self, f: F, t: f64, dt: f64) -> SolverStepResult
    where
        F: FnMut(&DVector<f64>, f64) -> DVector<f64>,
    {
        match self {
            Stepper::RK4(solver) => solver.step(f, t, dt),
            Stepper::RKBS32(solver) => solver.step(f, t, dt),
            Stepper::RKDP54(solver) => solver.step(f, t, dt),
        }
    }
}

/// Stick-slip simulation of a mass between two stops
///
/// Holds the physical parameters, the external forcing and the run
/// options. [`run`](Sim::run) is immutable and deterministic: the same
/// configuration always produces the same trajectory.
pub struct Sim<F: Forcing = RampedSine> {
    params: Params,
    forcing: F,
    options: SimOptions,
}

impl Sim<RampedSine> {
    /// Simulation with the default ramped-sine forcing
    pub fn new(params: Params) -> Result<Self, SimError> {
        Sim::with_forcing(params, RampedSine::default())
    }
}

impl<F: Forcing> Sim<F> {
    /// Simulation with a custom forcing
    pub fn with_forcing(params: Params, forcing: F) -> Result<Self, SimError> {
        params.validate()?;
        Ok(Self {
            params,
            forcing,
            options: SimOptions::default(),
        })
    }

    /// Replace the run options
    pub fn with_options(mut self, options: SimOptions) -> Self {
        self.options = options;
        self
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn options(&self) -> &SimOptions {
        &self.options
    }

    /// Run the simulation from `t = 0` to `horizon`
    ///
    /// # Errors
    ///
    /// Fails when the horizon is not positive and finite, when the
    /// initial position lies outside the stops, or when the adaptive
    /// stepsize collapses below `dt_min` without resolving an event.
    pub fn run(&self, horizon: f64) -> Result<Trajectory, SimError> {
        if !horizon.is_finite() || horizon <= 0.0 {
            return Err(SimError::InvalidHorizon(horizon));
        }

        let opts = &self.options;
        if opts.initial_position < self.params.left_stop
            || opts.initial_position > self.params.right_stop
        {
            return Err(SimError::InitialPositionOutOfRange {
                position: opts.initial_position,
                left_stop: self.params.left_stop,
                right_stop: self.params.right_stop,
            });
        }

        let y0 = pack(opts.initial_velocity, opts.initial_position);
        let mut stepper = Stepper::new(opts.solver, y0, opts.tol_abs, opts.tol_rel);

        // Every guard expression approaches its surface from below, so
        // each channel gets an upward-only detector; a channel masked
        // to zero, or one entered on the far side of its surface, can
        // never fire
        let mut detectors: [ZeroCrossingUp; GUARD_COUNT] =
            std::array::from_fn(|_| ZeroCrossingUp::new(opts.evt_tolerance));

        let mut state = opts.initial_state;
        let mut t = 0.0;
        let mut trajectory = Trajectory::default();
        self.record(&mut trajectory, t, &stepper, state);

        // Stepsize chosen by the error controller; a trial truncated
        // toward a crossing goes through `dt_event`, so `dt` itself is
        // only ever written by the controller and by rejections.
        let mut dt = opts.dt.min(opts.dt_max);
        let mut dt_event: Option<f64> = None;
        let mut steps = 0u64;
        let mut rejections = 0u64;

        info!(
            "running stick-slip simulation to t = {} with {}",
            horizon, opts.solver
        );

        while t < horizon {
            if dt < opts.dt_min {
                return Err(SimError::StepSizeCollapsed {
                    t,
                    dt,
                    dt_min: opts.dt_min,
                });
            }

            let mut dt_trial = dt_event.take().unwrap_or(dt);
            let reached = t + dt_trial >= horizon;
            if reached {
                dt_trial = horizon - t;
            }

            // Arm the detectors with the guard values at the step start
            let channels_start =
                guards::evaluate(state, stepper.state(), t, &self.params, &self.forcing);
            for (detector, value) in detectors.iter_mut().zip(channels_start) {
                detector.buffer(value, t);
            }
            stepper.buffer();

            let result = stepper.step(
                |y, tau| dynamics::derivative(state, y, tau, &self.params, &self.forcing),
                t,
                dt_trial,
            );

            if !result.success {
                stepper.revert()?;
                rejections += 1;
                dt = dt_trial * result.scale.unwrap_or(0.5);
                trace!(
                    "step rejected at t = {:.6} (error norm {:.3e}), retrying with dt = {:.3e}",
                    t,
                    result.error_norm,
                    dt
                );
                continue;
            }

            let t_new = if reached { horizon } else { t + dt_trial };

            // Scan the channels at the step endpoint; when several
            // cross in the same step the lowest index wins
            let channels_end =
                guards::evaluate(state, stepper.state(), t_new, &self.params, &self.forcing);
            let mut fired = None;
            for (index, detector) in detectors.iter().enumerate() {
                let detection = detector.detect(channels_end[index]);
                if detection.detected {
                    fired = Some((Guard::from_index(index), detection));
                    break;
                }
            }

            if let Some((guard, detection)) = fired {
                // A trial that crossed a guard surface is never kept
                stepper.revert()?;

                let gap = channels_start[guard.index()].abs();
                if gap > opts.evt_tolerance && dt_trial > opts.dt_min {
                    // Land short of the crossing, so the next accepted
                    // step ends on the near side of the surface
                    let dt_next =
                        (dt_trial * detection.ratio * EVT_TRUNCATION_FACTOR).max(opts.dt_min);
                    trace!(
                        "guard {} crossed within step at t = {:.6}, truncating to dt = {:.3e}",
                        guard,
                        t,
                        dt_next
                    );
                    dt_event = Some(dt_next);
                    continue;
                }

                // Resolve at the step start: the sample already
                // recorded at `t` is the left limit, within tolerance
                // on the near side of the surface
                let transition = transition::apply(guard, stepper.state(), &self.params);
                debug!(
                    "event {} at t = {:.6}: {} -> {}",
                    guard, t, state, transition.next
                );
                detectors[guard.index()].resolve(t);
                trajectory.push_event(EventRecord {
                    t,
                    guard,
                    from: state,
                    to: transition.next,
                });

                state = transition.next;
                stepper.set_state(transition.y);
                self.record(&mut trajectory, t, &stepper, state);
                continue;
            }

            t = t_new;
            steps += 1;
            self.record(&mut trajectory, t, &stepper, state);

            match result.scale {
                Some(scale) => dt = (dt_trial * scale.clamp(0.5, 2.0)).min(opts.dt_max),
                None => dt = opts.dt.min(opts.dt_max),
            }
        }

        info!(
            "finished at t = {:.3}: {} steps, {} rejections, {} events",
            t,
            steps,
            rejections,
            trajectory.events().len()
        );

        Ok(trajectory)
    }

    fn record(&self, trajectory: &mut Trajectory, t: f64, stepper: &Stepper, state: SlipState) {
        trajectory.push_sample(Sample {
            t,
            velocity: stepper.state()[VELOCITY],
            position: stepper.state()[POSITION],
            state,
        });
    }
}
