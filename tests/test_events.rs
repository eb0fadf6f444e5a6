//! Comprehensive tests for event detection on guard channels
//!
//! Secant ratio parity for the zero-crossing detectors, plus the
//! masking contract between the guard evaluation and the detectors:
//! a channel clamped to zero outside its governing mode must never
//! look like a crossing, and every guard in the transition table
//! fires on an upward crossing only.

use stickslip::events::{EventDetection, ZeroCrossing, ZeroCrossingUp};
use stickslip::model::{guards, state::pack, Guard, Params, SlipState, GUARD_COUNT};
use stickslip::utils::constants::EVT_TOLERANCE;

// ==================================================================================
// ZERO CROSSING TESTS
// ==================================================================================

#[test]
fn test_zerocrossing_detect_up() {
    // Channel value follows g(t) = t - 2, sampled by the caller
    let mut e = ZeroCrossing::new(EVT_TOLERANCE);

    // Before crossing: buffer at t=0 (g=-2), endpoint t=1 (g=-1)
    e.buffer(-2.0, 0.0);
    let det = e.detect(-1.0);
    assert!(!det.detected);
    assert!(!det.close);
    assert_eq!(det.ratio, 1.0);

    // Crossing from t=0 to t=3: ratio = |-2| / |-2 - 1| = 2/3
    let det = e.detect(1.0);
    assert!(det.detected);
    assert!(!det.close);
    assert!((det.ratio - 2.0 / 3.0).abs() < 1e-10);

    // Crossing from t=1 to t=3: ratio = |-1| / |-1 - 1| = 1/2
    e.buffer(-1.0, 1.0);
    let det = e.detect(1.0);
    assert!(det.detected);
    assert!(!det.close);
    assert!((det.ratio - 1.0 / 2.0).abs() < 1e-10);

    // After crossing: both samples positive
    e.buffer(1.0, 3.0);
    let det = e.detect(2.0);
    assert!(!det.detected);
    assert!(!det.close);
    assert_eq!(det.ratio, 1.0);
}

#[test]
fn test_zerocrossing_detect_down() {
    // Bidirectional: positive-to-negative fires with the same ratio
    let mut e = ZeroCrossing::new(EVT_TOLERANCE);

    e.buffer(2.0, 0.0);
    let det = e.detect(-1.0);
    assert!(det.detected);
    assert!((det.ratio - 2.0 / 3.0).abs() < 1e-10);
}

#[test]
fn test_zerocrossing_exact_hit() {
    let mut e = ZeroCrossing::new(EVT_TOLERANCE);

    e.buffer(-1.0, 0.0);
    let det = e.detect(0.0);
    assert!(det.detected);
    assert!(det.close);
    assert_eq!(det.ratio, 1.0);
}

#[test]
fn test_zerocrossing_close_resolution() {
    let mut e = ZeroCrossing::new(1e-3);

    // Endpoint within tolerance of zero: crossing is resolvable
    e.buffer(-0.5, 0.0);
    let det = e.detect(5e-4);
    assert!(det.detected);
    assert!(det.close);

    // Endpoint past tolerance: needs truncation first
    e.buffer(-0.5, 0.0);
    let det = e.detect(0.25);
    assert!(det.detected);
    assert!(!det.close);
    assert!((det.ratio - 2.0 / 3.0).abs() < 1e-10);
}

#[test]
fn test_zerocrossing_signed_zero_start_is_silent() {
    // Multiplying a signed zero into the product would carry its sign
    // bit into the crossing check; a step starting at zero must stay
    // silent in both detectors whichever way the endpoint moves
    let mut e = ZeroCrossing::new(EVT_TOLERANCE);
    e.buffer(0.0, 0.0);
    assert!(!e.detect(-1e-9).detected);
    e.buffer(-0.0, 0.0);
    assert!(!e.detect(1e-9).detected);

    let mut up = ZeroCrossingUp::new(EVT_TOLERANCE);
    up.buffer(0.0, 0.0);
    assert!(!up.detect(-1e-9).detected);
    assert!(!up.detect(1e-9).detected);
    up.buffer(-0.0, 0.0);
    assert!(!up.detect(-1e-9).detected);
    assert!(!up.detect(1e-9).detected);
}

#[test]
fn test_zerocrossing_up_direction() {
    let mut up = ZeroCrossingUp::new(EVT_TOLERANCE);

    // Upward crossing fires with the secant ratio
    up.buffer(-2.0, 0.0);
    let det = up.detect(1.0);
    assert!(det.detected);
    assert!((det.ratio - 2.0 / 3.0).abs() < 1e-10);

    // Downward crossing is ignored
    up.buffer(2.0, 0.0);
    let det = up.detect(-1.0);
    assert!(!det.detected);
    assert_eq!(det.ratio, 1.0);

    // Exact arrival counts only from below
    up.buffer(-0.5, 0.0);
    assert!(up.detect(0.0).detected);
    up.buffer(0.5, 0.0);
    assert!(!up.detect(0.0).detected);
}

#[test]
fn test_zerocrossing_event_bookkeeping() {
    let mut e = ZeroCrossing::new(EVT_TOLERANCE);
    assert!(e.is_empty());

    e.resolve(1.5);
    e.resolve(2.75);
    assert_eq!(e.len(), 2);
    assert_eq!(e.event_times(), &[1.5, 2.75]);

    e.reset();
    assert!(e.is_empty());
    assert!(!e.detect(1.0).detected); // history cleared too
}

// ==================================================================================
// GUARD CHANNEL TESTS
// ==================================================================================

#[test]
fn test_masked_guard_channels_never_fire() {
    // Drive the detectors the way the simulation loop does, through a
    // mode where most channels are clamped to zero
    let params = Params::default();
    let forcing = |t: f64| 10.0 * t;
    let mut detectors: Vec<ZeroCrossingUp> = (0..GUARD_COUNT)
        .map(|_| ZeroCrossingUp::new(EVT_TOLERANCE))
        .collect();

    let y = pack(0.0, 0.0);
    let mut fired = Vec::new();

    let mut t = 0.0;
    let dt = 0.05;
    while t < 1.0 {
        let before = guards::evaluate(SlipState::AtRest, &y, t, &params, &forcing);
        for (detector, value) in detectors.iter_mut().zip(before) {
            detector.buffer(value, t);
        }

        let after = guards::evaluate(SlipState::AtRest, &y, t + dt, &params, &forcing);
        for (index, detector) in detectors.iter().enumerate() {
            if detector.detect(after[index]).detected {
                fired.push(Guard::from_index(index));
            }
        }
        t += dt;
    }

    // The ramp crosses breakaway at t = 0.7848; only the rightward
    // rest channel may fire, every masked channel stays silent
    assert_eq!(fired, vec![Guard::RestBreakRight]);
}

#[test]
fn test_masked_guard_channels_stay_silent_leftward() {
    // Same sweep with the force ramping the other way: the leftward
    // rest channel crosses, nothing else utters a sound
    let params = Params::default();
    let forcing = |t: f64| -10.0 * t;
    let mut detectors: Vec<ZeroCrossingUp> = (0..GUARD_COUNT)
        .map(|_| ZeroCrossingUp::new(EVT_TOLERANCE))
        .collect();

    let y = pack(0.0, 0.0);
    let mut fired = Vec::new();

    let mut t = 0.0;
    let dt = 0.05;
    while t < 1.0 {
        let before = guards::evaluate(SlipState::AtRest, &y, t, &params, &forcing);
        for (detector, value) in detectors.iter_mut().zip(before) {
            detector.buffer(value, t);
        }

        let after = guards::evaluate(SlipState::AtRest, &y, t + dt, &params, &forcing);
        for (index, detector) in detectors.iter().enumerate() {
            if detector.detect(after[index]).detected {
                fired.push(Guard::from_index(index));
            }
        }
        t += dt;
    }

    assert_eq!(fired, vec![Guard::RestBreakLeft]);
}

#[test]
fn test_slide_onset_velocity_channel_stays_silent() {
    // Entering a slide from rest buffers a halt channel of exactly
    // zero; the first nonzero velocity endpoint must not fire it, or
    // every fresh slide would halt at its own first step
    let params = Params::default();
    let forcing = |_t: f64| -20.0;
    let index = Guard::LeftSlideHalt.index();
    let mut detector = ZeroCrossingUp::new(EVT_TOLERANCE);

    let y0 = pack(0.0, 0.0);
    let g0 = guards::evaluate(SlipState::SlidingLeft, &y0, 0.0, &params, &forcing);
    assert_eq!(g0[index], 0.0);
    detector.buffer(g0[index], 0.0);

    let y1 = pack(-1e-9, 0.0);
    let g1 = guards::evaluate(SlipState::SlidingLeft, &y1, 0.01, &params, &forcing);
    assert!(!detector.detect(g1[index]).detected);

    // Once the slide is under way the channel arms normally and fires
    // when the velocity comes back up to zero
    let y2 = pack(-0.5, -0.1);
    let g2 = guards::evaluate(SlipState::SlidingLeft, &y2, 0.5, &params, &forcing);
    detector.buffer(g2[index], 0.5);

    let y3 = pack(0.02, -0.12);
    let g3 = guards::evaluate(SlipState::SlidingLeft, &y3, 0.6, &params, &forcing);
    assert!(detector.detect(g3[index]).detected);
}

#[test]
fn test_live_guard_channel_ratio() {
    // The rightward rest channel is F(t) - mu_s*m*g; with a linear
    // ramp the secant ratio lands the crossing exactly
    let params = Params::default();
    let forcing = |t: f64| 10.0 * t;
    let breakaway = 0.8 * 9.81;
    let t_cross = breakaway / 10.0;

    let y = pack(0.0, 0.0);
    let t0 = t_cross - 0.1;
    let t1 = t_cross + 0.3;

    let g0 = guards::evaluate(SlipState::AtRest, &y, t0, &params, &forcing);
    let g1 = guards::evaluate(SlipState::AtRest, &y, t1, &params, &forcing);

    let index = Guard::RestBreakRight.index();
    let mut detector = ZeroCrossingUp::new(EVT_TOLERANCE);
    detector.buffer(g0[index], t0);
    let det = detector.detect(g1[index]);

    assert!(det.detected);
    let t_estimate = t0 + det.ratio * (t1 - t0);
    assert!((t_estimate - t_cross).abs() < 1e-10);
}

#[test]
fn test_default_detection() {
    let det = EventDetection::default();
    assert!(!det.detected);
    assert!(!det.close);
    assert_eq!(det.ratio, 1.0);
}
