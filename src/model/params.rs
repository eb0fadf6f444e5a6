//! Physical parameters of the sliding mass

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameter validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("Mass {0} must be positive and finite")]
    InvalidMass(f64),

    #[error("Gravity {0} must be non-negative and finite")]
    InvalidGravity(f64),

    #[error("Friction coefficients must satisfy 0 <= kinetic ({mu_kinetic}) <= static ({mu_static})")]
    InvalidFriction { mu_static: f64, mu_kinetic: f64 },

    #[error("Restitution {0} must lie in [0, 1]")]
    InvalidRestitution(f64),

    #[error("Stops must satisfy left ({left_stop}) < right ({right_stop}), both finite")]
    InvalidStops { left_stop: f64, right_stop: f64 },
}

/// Physical parameters of the mass, the friction contact and the stops
///
/// Distances are in meters, masses in kilograms, forces in newtons.
/// A kinetic coefficient above the static one would re-stick the mass
/// the instant it breaks away, so [`validate`](Params::validate)
/// rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Mass of the sliding body
    pub mass: f64,

    /// Gravitational acceleration (sets the normal force)
    pub gravity: f64,

    /// Static friction coefficient
    pub mu_static: f64,

    /// Kinetic friction coefficient
    pub mu_kinetic: f64,

    /// Coefficient of restitution at the stops (0 = inelastic capture)
    pub restitution: f64,

    /// Position of the left stop
    pub left_stop: f64,

    /// Position of the right stop
    pub right_stop: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            mass: 1.0,
            gravity: 9.81,
            mu_static: 0.8,
            mu_kinetic: 0.5,
            restitution: 0.3,
            left_stop: -0.5,
            right_stop: 0.5,
        }
    }
}

impl Params {
    /// Check physical consistency of the parameter set
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(ParamsError::InvalidMass(self.mass));
        }
        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return Err(ParamsError::InvalidGravity(self.gravity));
        }
        if !self.mu_static.is_finite()
            || !self.mu_kinetic.is_finite()
            || self.mu_kinetic < 0.0
            || self.mu_kinetic > self.mu_static
        {
            return Err(ParamsError::InvalidFriction {
                mu_static: self.mu_static,
                mu_kinetic: self.mu_kinetic,
            });
        }
        if !self.restitution.is_finite() || !(0.0..=1.0).contains(&self.restitution) {
            return Err(ParamsError::InvalidRestitution(self.restitution));
        }
        if !self.left_stop.is_finite()
            || !self.right_stop.is_finite()
            || self.left_stop >= self.right_stop
        {
            return Err(ParamsError::InvalidStops {
                left_stop: self.left_stop,
                right_stop: self.right_stop,
            });
        }
        Ok(())
    }

    /// Force needed to overcome static friction
    pub fn breakaway_force(&self) -> f64 {
        self.mass * self.gravity * self.mu_static
    }

    /// Magnitude of the kinetic friction force while sliding
    pub fn kinetic_force(&self) -> f64 {
        self.mass * self.gravity * self.mu_kinetic
    }
}
