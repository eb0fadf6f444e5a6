//! Guard channels that trigger mode transitions

use nalgebra::DVector;

use super::forcing::Forcing;
use super::params::Params;
use super::state::{SlipState, POSITION, VELOCITY};

/// Number of guard channels
pub const GUARD_COUNT: usize = 8;

/// One zero-crossing channel of the mode machine
///
/// Every guard belongs to exactly one governing mode and is clamped to
/// zero whenever that mode is not active, so a channel can only fire
/// while its transition is legal. Channel indices are stable; when
/// several channels cross in the same step the driver resolves the
/// lowest index first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Guard {
    /// Force overcomes static friction pushing right, off the left stop
    LeftStopBreakaway,
    /// Rightward slide decelerates to a standstill
    RightSlideHalt,
    /// Rightward slide reaches the right stop
    RightStopImpact,
    /// Force overcomes static friction pushing right, from rest
    RestBreakRight,
    /// Force overcomes static friction pushing left, from rest
    RestBreakLeft,
    /// Leftward slide decelerates to a standstill
    LeftSlideHalt,
    /// Leftward slide reaches the left stop
    LeftStopImpact,
    /// Force overcomes static friction pushing left, off the right stop
    RightStopBreakaway,
}

impl Guard {
    /// All channels in index order
    pub const ALL: [Guard; GUARD_COUNT] = [
        Guard::LeftStopBreakaway,
        Guard::RightSlideHalt,
        Guard::RightStopImpact,
        Guard::RestBreakRight,
        Guard::RestBreakLeft,
        Guard::LeftSlideHalt,
        Guard::LeftStopImpact,
        Guard::RightStopBreakaway,
    ];

    /// Stable channel index
    pub const fn index(self) -> usize {
        match self {
            Guard::LeftStopBreakaway => 0,
            Guard::RightSlideHalt => 1,
            Guard::RightStopImpact => 2,
            Guard::RestBreakRight => 3,
            Guard::RestBreakLeft => 4,
            Guard::LeftSlideHalt => 5,
            Guard::LeftStopImpact => 6,
            Guard::RightStopBreakaway => 7,
        }
    }

    /// Channel for the given index
    ///
    /// # Panics
    ///
    /// Panics when `index >= GUARD_COUNT`. An out-of-range index can
    /// only come from a bug in the caller, so this fails fast instead
    /// of returning an error.
    pub fn from_index(index: usize) -> Guard {
        *Guard::ALL
            .get(index)
            .unwrap_or_else(|| panic!("Guard index {} out of range (< {})", index, GUARD_COUNT))
    }

    /// Mode in which this channel is live
    pub const fn governing_state(self) -> SlipState {
        match self {
            Guard::LeftStopBreakaway => SlipState::AtLeftStop,
            Guard::RightSlideHalt | Guard::RightStopImpact => SlipState::SlidingRight,
            Guard::RestBreakRight | Guard::RestBreakLeft => SlipState::AtRest,
            Guard::LeftSlideHalt | Guard::LeftStopImpact => SlipState::SlidingLeft,
            Guard::RightStopBreakaway => SlipState::AtRightStop,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Guard::LeftStopBreakaway => "LeftStopBreakaway",
            Guard::RightSlideHalt => "RightSlideHalt",
            Guard::RightStopImpact => "RightStopImpact",
            Guard::RestBreakRight => "RestBreakRight",
            Guard::RestBreakLeft => "RestBreakLeft",
            Guard::LeftSlideHalt => "LeftSlideHalt",
            Guard::LeftStopImpact => "LeftStopImpact",
            Guard::RightStopBreakaway => "RightStopBreakaway",
        }
    }
}

impl std::fmt::Display for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluate all guard channels at `(y, t)` under the active mode
///
/// Channels whose governing mode is not active are exactly `0.0`, not
/// merely small, so the detectors see a flat line instead of a phantom
/// crossing. Each live channel is negative while its condition is
/// unmet and crosses upward through zero when the transition fires.
pub fn evaluate<F: Forcing>(
    state: SlipState,
    y: &DVector<f64>,
    t: f64,
    params: &Params,
    forcing: &F,
) -> [f64; GUARD_COUNT] {
    let mut channels = [0.0; GUARD_COUNT];
    for guard in Guard::ALL {
        if state == guard.governing_state() {
            channels[guard.index()] = expression(guard, y, t, params, forcing);
        }
    }
    channels
}

/// Raw guard expression, before mode masking
fn expression<F: Forcing>(
    guard: Guard,
    y: &DVector<f64>,
    t: f64,
    params: &Params,
    forcing: &F,
) -> f64 {
    match guard {
        Guard::LeftStopBreakaway | Guard::RestBreakRight => {
            forcing.force(t) - params.breakaway_force()
        }
        Guard::RestBreakLeft | Guard::RightStopBreakaway => {
            -forcing.force(t) - params.breakaway_force()
        }
        Guard::RightSlideHalt => -y[VELOCITY],
        Guard::LeftSlideHalt => y[VELOCITY],
        Guard::RightStopImpact => y[POSITION] - params.right_stop,
        Guard::LeftStopImpact => params.left_stop - y[POSITION],
    }
}
