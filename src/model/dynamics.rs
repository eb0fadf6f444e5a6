//! Right-hand side selection per discrete mode

use nalgebra::DVector;

use super::forcing::Forcing;
use super::params::Params;
use super::state::{SlipState, POSITION, VELOCITY};

/// Time derivative of the continuous state under the given mode
///
/// Pinned modes hold the mass perfectly still; the sliding modes apply
/// the external force opposed by kinetic friction. Pure and cheap: the
/// integrator calls this at every stage, including rejected trials.
pub fn derivative<F: Forcing>(
    state: SlipState,
    y: &DVector<f64>,
    t: f64,
    params: &Params,
    forcing: &F,
) -> DVector<f64> {
    let mut dydt = DVector::zeros(2);
    match state {
        SlipState::AtLeftStop | SlipState::AtRest | SlipState::AtRightStop => {}
        SlipState::SlidingRight => {
            dydt[VELOCITY] = (forcing.force(t) - params.kinetic_force()) / params.mass;
            dydt[POSITION] = y[VELOCITY];
        }
        SlipState::SlidingLeft => {
            dydt[VELOCITY] = (forcing.force(t) + params.kinetic_force()) / params.mass;
            dydt[POSITION] = y[VELOCITY];
        }
    }
    dydt
}
