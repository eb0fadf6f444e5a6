//! Zero-crossing detection for the mode machine
//!
//! Guard channels are sampled before and after each trial step; the
//! detector reports whether a channel crossed zero, whether the step
//! endpoint is close enough to resolve, and a secant ratio for
//! shrinking the step toward the crossing. Every guard in the
//! transition table approaches its surface from below, so the driver
//! watches each channel with an upward-only detector.

mod zerocrossing;

pub use zerocrossing::{EventDetection, ZeroCrossing, ZeroCrossingUp};
