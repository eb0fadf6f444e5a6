//! Mode transitions and continuous-state resets

use nalgebra::DVector;

use super::guards::Guard;
use super::params::Params;
use super::state::{SlipState, VELOCITY};

/// Outcome of a fired guard: the next mode and the reset continuous state
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: SlipState,
    pub y: DVector<f64>,
}

/// Apply the transition for a fired guard
///
/// Pure: the caller threads the returned pair into the integrator.
/// Breakaway guards keep the continuous state untouched, halts force
/// the velocity to exactly zero, and stop impacts either capture the
/// mass (zero restitution or zero incoming speed) or reflect the
/// velocity scaled by the restitution coefficient. Position is never
/// reset.
pub fn apply(guard: Guard, y: &DVector<f64>, params: &Params) -> Transition {
    match guard {
        Guard::LeftStopBreakaway | Guard::RestBreakRight => Transition {
            next: SlipState::SlidingRight,
            y: y.clone(),
        },
        Guard::RestBreakLeft | Guard::RightStopBreakaway => Transition {
            next: SlipState::SlidingLeft,
            y: y.clone(),
        },
        Guard::RightSlideHalt | Guard::LeftSlideHalt => {
            let mut y = y.clone();
            y[VELOCITY] = 0.0;
            Transition {
                next: SlipState::AtRest,
                y,
            }
        }
        Guard::RightStopImpact => bounce(y, params, SlipState::AtRightStop, SlipState::SlidingLeft),
        Guard::LeftStopImpact => bounce(y, params, SlipState::AtLeftStop, SlipState::SlidingRight),
    }
}

/// Stop impact: inelastic capture or a restitution-scaled rebound
fn bounce(
    y: &DVector<f64>,
    params: &Params,
    captured: SlipState,
    rebound: SlipState,
) -> Transition {
    let mut y = y.clone();
    // A zero-speed impact has no rebound; the mass is pinned at the
    // stop, where the stop's own breakaway guard is live
    if params.restitution == 0.0 || y[VELOCITY] == 0.0 {
        y[VELOCITY] = 0.0;
        Transition { next: captured, y }
    } else {
        y[VELOCITY] = -params.restitution * y[VELOCITY];
        Transition { next: rebound, y }
    }
}
