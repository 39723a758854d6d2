//! Solver-level parameters for barrier and friction evaluation.
//!
//! These are passed into every evaluation rather than stored on constraints,
//! since a solver may change them between iterations.

use tracing::warn;

use crate::{IpcError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Barrier activation settings.
///
/// The barrier acts on squared distances: a pair at distance `d` contributes
/// while `d² - min_distance² < 2·min_distance·dhat + dhat²`, i.e. while
/// `d < min_distance + dhat`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BarrierParams {
    /// Activation distance beyond the minimum separation.
    pub dhat: f64,
    /// Clearance that is treated as contact.
    pub min_distance: f64,
}

impl Default for BarrierParams {
    fn default() -> Self {
        Self {
            dhat: 1e-3,
            min_distance: 0.0,
        }
    }
}

impl BarrierParams {
    /// Create parameters with the given activation distance and no clearance.
    #[must_use]
    pub fn new(dhat: f64) -> Self {
        Self {
            dhat,
            ..Default::default()
        }
    }

    /// Set the minimum separation.
    #[must_use]
    pub fn with_min_distance(mut self, min_distance: f64) -> Self {
        self.min_distance = min_distance;
        self
    }

    /// Distance at which the barrier switches off: `min_distance + dhat`.
    #[must_use]
    pub fn activation_distance(&self) -> f64 {
        self.min_distance + self.dhat
    }

    /// Squared-distance offset subtracted before the barrier: `min_distance²`.
    #[must_use]
    pub fn squared_offset(&self) -> f64 {
        self.min_distance * self.min_distance
    }

    /// Barrier threshold in offset squared-distance units:
    /// `2·min_distance·dhat + dhat²`.
    #[must_use]
    pub fn squared_activation(&self) -> f64 {
        2.0 * self.min_distance * self.dhat + self.dhat * self.dhat
    }

    /// Validate the parameters.
    pub fn validate(&self) -> Result<()> {
        if !self.dhat.is_finite() || self.dhat <= 0.0 {
            warn!(dhat = self.dhat, "rejected barrier parameters");
            return Err(IpcError::invalid_config(format!(
                "dhat must be positive and finite, got {}",
                self.dhat
            )));
        }

        if !self.min_distance.is_finite() || self.min_distance < 0.0 {
            warn!(
                min_distance = self.min_distance,
                "rejected barrier parameters"
            );
            return Err(IpcError::invalid_config(format!(
                "min_distance must be non-negative and finite, got {}",
                self.min_distance
            )));
        }

        Ok(())
    }
}

/// Smooth Coulomb friction settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrictionParams {
    /// Tangential speed below which static friction is smoothed.
    pub epsv: f64,
    /// Coefficient of friction.
    pub mu: f64,
}

impl Default for FrictionParams {
    fn default() -> Self {
        Self {
            epsv: 1e-3,
            mu: 0.5,
        }
    }
}

impl FrictionParams {
    /// Create friction parameters.
    #[must_use]
    pub fn new(epsv: f64, mu: f64) -> Self {
        Self { epsv, mu }
    }

    /// Frictionless contact.
    #[must_use]
    pub fn frictionless() -> Self {
        Self {
            mu: 0.0,
            ..Default::default()
        }
    }

    /// Set the smoothing speed.
    #[must_use]
    pub fn epsv(mut self, epsv: f64) -> Self {
        self.epsv = epsv;
        self
    }

    /// Set the friction coefficient, clamped to be non-negative.
    #[must_use]
    pub fn mu(mut self, mu: f64) -> Self {
        self.mu = mu.max(0.0);
        self
    }

    /// Validate the parameters.
    pub fn validate(&self) -> Result<()> {
        if !self.epsv.is_finite() || self.epsv <= 0.0 {
            warn!(epsv = self.epsv, "rejected friction parameters");
            return Err(IpcError::invalid_config(format!(
                "epsv must be positive and finite, got {}",
                self.epsv
            )));
        }

        if !self.mu.is_finite() || self.mu < 0.0 {
            warn!(mu = self.mu, "rejected friction parameters");
            return Err(IpcError::invalid_config("friction cannot be negative"));
        }

        Ok(())
    }
}
