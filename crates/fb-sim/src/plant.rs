//! Process model driven by the actuator.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::is_positive;

/// First-order lag `tau * dy/dt = gain * u - y`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FirstOrderPlant {
    pub gain: f64,
    /// Time constant in seconds.
    pub tau: f64,
}

impl FirstOrderPlant {
    pub fn new(gain: f64, tau: f64) -> SimResult<Self> {
        if !gain.is_finite() {
            return Err(SimError::InvalidArg {
                what: "plant gain must be finite",
            });
        }
        if !is_positive(tau) {
            return Err(SimError::InvalidArg {
                what: "plant tau must be positive",
            });
        }
        Ok(Self { gain, tau })
    }

    pub fn dydt(&self, output: f64, input: f64) -> f64 {
        (self.gain * input - output) / self.tau
    }

    /// Advance the output by `dt` with explicit Euler.
    pub fn step(&self, output: f64, dt: f64, input: f64) -> f64 {
        output + self.dydt(output, input) * dt
    }
}
