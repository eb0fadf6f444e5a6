//! External forcing applied to the mass

/// Time-dependent external force
///
/// Any `Fn(f64) -> f64` closure works through the blanket
/// implementation, so forcing profiles can be swapped without
/// wrapping them in a type.
pub trait Forcing: Send + Sync {
    /// Force at time `t`
    fn force(&self, t: f64) -> f64;
}

impl<T> Forcing for T
where
    T: Fn(f64) -> f64 + Send + Sync,
{
    fn force(&self, t: f64) -> f64 {
        self(t)
    }
}

/// Sine wave with a triangular amplitude envelope
///
/// The amplitude ramps up linearly until `switch_time`, then back down
/// at the same rate, while the carrier sine runs at a fixed `period`:
///
/// ```text
/// t <  switch_time:  rate * t                  * sin(2*pi*t / period)
/// t >= switch_time:  rate * (2*switch_time - t) * sin(2*pi*t / period)
/// ```
///
/// The envelope is continuous at the switch. The default profile
/// (rate 1/2, switch at 25 s, period 2 s) sweeps the force well past
/// the breakaway threshold of the default parameter set and back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampedSine {
    /// Amplitude growth rate in newtons per second
    pub rate: f64,
    /// Time at which the envelope starts ramping back down
    pub switch_time: f64,
    /// Period of the carrier sine
    pub period: f64,
}

impl RampedSine {
    pub fn new(rate: f64, switch_time: f64, period: f64) -> Self {
        Self {
            rate,
            switch_time,
            period,
        }
    }
}

impl Default for RampedSine {
    fn default() -> Self {
        Self {
            rate: 0.5,
            switch_time: 25.0,
            period: 2.0,
        }
    }
}

impl Forcing for RampedSine {
    fn force(&self, t: f64) -> f64 {
        let amplitude = if t < self.switch_time {
            self.rate * t
        } else {
            self.rate * (2.0 * self.switch_time - t)
        };
        amplitude * (2.0 * std::f64::consts::PI * t / self.period).sin()
    }
}
