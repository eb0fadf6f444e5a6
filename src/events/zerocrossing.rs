//! Zero-crossing detectors over sampled guard values
//!
//! Bidirectional and upward-only detection with secant-based
//! interpolation for event localization.

use crate::utils::constants::TOLERANCE;

/// Result of event detection over one trial step
#[derive(Debug, Clone, Copy)]
pub struct EventDetection {
    /// Did the channel cross zero during the step?
    pub detected: bool,
    /// Is the step endpoint close enough to resolve the event?
    pub close: bool,
    /// Secant estimate of the crossing position within the step (0 to 1)
    pub ratio: f64,
}

impl Default for EventDetection {
    fn default() -> Self {
        Self {
            detected: false,
            close: false,
            ratio: 1.0,
        }
    }
}

/// Bidirectional zero-crossing detector
///
/// Fed with guard values rather than holding an event closure: the
/// guard expressions depend on the active mode, which the simulation
/// driver threads from step to step, so the driver samples the channel
/// and hands the values in. [`buffer`](ZeroCrossing::buffer) stores
/// the value at the step start, [`detect`](ZeroCrossing::detect)
/// compares the step endpoint against it, and
/// [`resolve`](ZeroCrossing::resolve) records the event time and
/// clears the history.
///
/// A step starting exactly at zero is never a crossing. The product of
/// the endpoint with a signed zero carries the zero's sign bit, so the
/// start value is checked on its own rather than through the product.
#[derive(Debug, Clone)]
pub struct ZeroCrossing {
    tolerance: f64,
    history: Option<(f64, f64)>, // (value, time)
    times: Vec<f64>,
}

impl ZeroCrossing {
    /// Create a detector with the given resolution tolerance
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            history: None,
            times: Vec::new(),
        }
    }

    /// Store the channel value at the start of a trial step
    pub fn buffer(&mut self, value: f64, t: f64) {
        self.history = Some((value, t));
    }

    /// Compare the step-endpoint value against the buffered one
    pub fn detect(&self, value: f64) -> EventDetection {
        let Some((prev, _prev_t)) = self.history else {
            return EventDetection::default();
        };

        // Exactly hit zero
        if value == 0.0 && prev != 0.0 {
            return EventDetection {
                detected: true,
                close: true,
                ratio: 1.0,
            };
        }

        // Check if we're close to the event
        let close = value.abs() <= self.tolerance;

        // Check for sign change (bidirectional)
        let is_event = (value * prev).signum() < 0.0;

        // No event, or the step started on the zero itself
        if !is_event || prev == 0.0 {
            return EventDetection {
                detected: false,
                close: false,
                ratio: 1.0,
            };
        }

        // Secant method interpolation
        let ratio = prev.abs() / (prev - value).abs().max(TOLERANCE);

        EventDetection {
            detected: true,
            close,
            ratio,
        }
    }

    /// Record a resolved event at time `t` and clear the history
    pub fn resolve(&mut self, t: f64) {
        self.times.push(t);
        self.history = None;
    }

    /// Times of all resolved events
    pub fn event_times(&self) -> &[f64] {
        &self.times
    }

    /// Number of resolved events
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Clear history and recorded events
    pub fn reset(&mut self) {
        self.history = None;
        self.times.clear();
    }
}

/// Upward zero-crossing detector
///
/// Triggers only when the channel crosses zero from negative to
/// positive. A step starting at or above zero never fires, whatever
/// the endpoint does; the channel must first dip below zero and then
/// come back up. Value-fed like [`ZeroCrossing`].
#[derive(Debug, Clone)]
pub struct ZeroCrossingUp {
    tolerance: f64,
    history: Option<(f64, f64)>, // (value, time)
    times: Vec<f64>,
}

impl ZeroCrossingUp {
    /// Create a detector with the given resolution tolerance
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            history: None,
            times: Vec::new(),
        }
    }

    /// Store the channel value at the start of a trial step
    pub fn buffer(&mut self, value: f64, t: f64) {
        self.history = Some((value, t));
    }

    /// Compare the step-endpoint value against the buffered one
    pub fn detect(&self, value: f64) -> EventDetection {
        let Some((prev, _prev_t)) = self.history else {
            return EventDetection::default();
        };

        // Exactly hit zero (from the negative side)
        if value == 0.0 && prev < 0.0 {
            return EventDetection {
                detected: true,
                close: true,
                ratio: 1.0,
            };
        }

        // Check if we're close to the event
        let close = value.abs() <= self.tolerance;

        // Check for sign change AND upward direction
        let is_event = (value * prev).signum() < 0.0 && value > prev;

        // No event, or wrong direction; `prev >= 0.0` also holds for
        // signed zeros, so a channel buffered at zero stays silent
        if !is_event || prev >= 0.0 {
            return EventDetection {
                detected: false,
                close: false,
                ratio: 1.0,
            };
        }

        // Secant method interpolation
        let ratio = prev.abs() / (prev - value).abs().max(TOLERANCE);

        EventDetection {
            detected: true,
            close,
            ratio,
        }
    }

    /// Record a resolved event at time `t` and clear the history
    pub fn resolve(&mut self, t: f64) {
        self.times.push(t);
        self.history = None;
    }

    /// Times of all resolved events
    pub fn event_times(&self) -> &[f64] {
        &self.times
    }

    /// Number of resolved events
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Clear history and recorded events
    pub fn reset(&mut self) {
        self.history = None;
        self.times.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::EVT_TOLERANCE;

    #[test]
    fn test_no_crossing() {
        let mut e = ZeroCrossing::new(EVT_TOLERANCE);
        e.buffer(-2.0, 0.0);

        let det = e.detect(-1.0);
        assert!(!det.detected);
        assert!(!det.close);
        assert_eq!(det.ratio, 1.0);
    }

    #[test]
    fn test_secant_ratio() {
        let mut e = ZeroCrossing::new(EVT_TOLERANCE);

        // From -2 to 1 the crossing sits two thirds into the step
        e.buffer(-2.0, 0.0);
        let det = e.detect(1.0);
        assert!(det.detected);
        assert!(!det.close);
        assert!((det.ratio - 2.0 / 3.0).abs() < 1e-10);

        // From -1 to 1 it sits in the middle
        e.buffer(-1.0, 1.0);
        let det = e.detect(1.0);
        assert!(det.detected);
        assert!(!det.close);
        assert!((det.ratio - 1.0 / 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_downward_crossing_detected() {
        let mut e = ZeroCrossing::new(EVT_TOLERANCE);
        e.buffer(0.5, 0.0);

        let det = e.detect(-1.5);
        assert!(det.detected);
        assert!((det.ratio - 0.25).abs() < 1e-10);
    }

    #[test]
    fn test_exactly_zero() {
        let mut e = ZeroCrossing::new(EVT_TOLERANCE);
        e.buffer(-1.0, 1.0);

        let det = e.detect(0.0);
        assert!(det.detected);
        assert!(det.close);
        assert_eq!(det.ratio, 1.0);
    }

    #[test]
    fn test_close_within_tolerance() {
        let mut e = ZeroCrossing::new(1e-3);
        e.buffer(-1.0, 0.0);

        let det = e.detect(5e-4);
        assert!(det.detected);
        assert!(det.close);
    }

    #[test]
    fn test_masked_channel_never_fires() {
        // A channel clamped to zero on both sides is not a crossing
        let mut e = ZeroCrossing::new(EVT_TOLERANCE);
        e.buffer(0.0, 0.0);

        let det = e.detect(0.0);
        assert!(!det.detected);
        assert!(!det.close);
    }

    #[test]
    fn test_zero_start_moving_negative_is_silent() {
        // The product 0.0 * -1e-9 is -0.0, whose signum is -1; the
        // start-value check must keep this from reading as a crossing
        let mut e = ZeroCrossing::new(EVT_TOLERANCE);
        e.buffer(0.0, 0.0);

        let det = e.detect(-1e-9);
        assert!(!det.detected);
        assert!(!det.close);

        // Same for a negative zero moving positive
        e.buffer(-0.0, 0.0);
        let det = e.detect(1e-9);
        assert!(!det.detected);
    }

    #[test]
    fn test_detect_without_history() {
        let e = ZeroCrossing::new(EVT_TOLERANCE);
        let det = e.detect(1.0);
        assert!(!det.detected);
        assert_eq!(det.ratio, 1.0);
    }

    #[test]
    fn test_resolve_records_times_and_clears_history() {
        let mut e = ZeroCrossing::new(EVT_TOLERANCE);
        assert!(e.is_empty());

        e.buffer(-1.0, 2.0);
        e.resolve(2.5);
        e.resolve(4.0);
        assert_eq!(e.len(), 2);
        assert_eq!(e.event_times(), &[2.5, 4.0]);

        // History is gone until the next buffer
        let det = e.detect(1.0);
        assert!(!det.detected);

        e.reset();
        assert!(e.is_empty());
    }

    #[test]
    fn test_up_fires_on_upward_crossing() {
        let mut e = ZeroCrossingUp::new(EVT_TOLERANCE);
        e.buffer(-2.0, 0.0);

        let det = e.detect(1.0);
        assert!(det.detected);
        assert!((det.ratio - 2.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_up_ignores_downward_crossing() {
        let mut e = ZeroCrossingUp::new(EVT_TOLERANCE);
        e.buffer(2.0, 0.0);

        let det = e.detect(-1.0);
        assert!(!det.detected);
        assert_eq!(det.ratio, 1.0);
    }

    #[test]
    fn test_up_rejects_zero_start() {
        // A channel buffered at zero, either signed zero, must not fire
        // no matter which way the endpoint moves
        let mut e = ZeroCrossingUp::new(EVT_TOLERANCE);

        e.buffer(0.0, 0.0);
        assert!(!e.detect(-1e-9).detected);
        assert!(!e.detect(1e-9).detected);

        e.buffer(-0.0, 0.0);
        assert!(!e.detect(-1e-9).detected);
        assert!(!e.detect(1e-9).detected);
    }

    #[test]
    fn test_up_exact_arrival_from_below() {
        let mut e = ZeroCrossingUp::new(EVT_TOLERANCE);
        e.buffer(-0.5, 0.0);

        let det = e.detect(0.0);
        assert!(det.detected);
        assert!(det.close);
        assert_eq!(det.ratio, 1.0);

        // Arriving at zero from above is not an upward crossing
        e.buffer(0.5, 1.0);
        assert!(!e.detect(0.0).detected);
    }

    #[test]
    fn test_up_resolve_clears_history() {
        let mut e = ZeroCrossingUp::new(EVT_TOLERANCE);
        e.buffer(-0.25, 0.0);
        e.resolve(1.0);

        assert_eq!(e.event_times(), &[1.0]);
        assert!(!e.detect(1.0).detected);
    }
}
