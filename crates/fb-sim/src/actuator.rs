//! Actuator dynamics between the controller command and the plant input.
//!
//! First-order lag with a rate limit and position limits, the usual model for
//! a motor-driven valve or a heater with slew-rate constraints. When the
//! actuator lags the command, the position is the signal a tracking
//! controller should follow.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::is_positive;

/// Position of a first-order actuator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActuatorState {
    pub position: f64,
}

/// First-order actuator with rate limiting.
///
/// Dynamics: `dpos/dt = (cmd - pos) / tau`, clamped to
/// `[-rate_limit, rate_limit]`; the position stays in
/// `[min_position, max_position]`.
///
/// # Example
///
/// ```
/// use fb_sim::{ActuatorState, FirstOrderActuator};
///
/// let actuator = FirstOrderActuator::new(0.2, 5.0, 0.0, 1.0).unwrap();
/// let mut state = ActuatorState::default();
/// for _ in 0..100 {
///     state = actuator.step(&state, 0.01, 1.0);
/// }
/// assert!(state.position > 0.9);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FirstOrderActuator {
    /// Time constant in seconds.
    pub tau: f64,
    /// Maximum rate of change per second.
    pub rate_limit: f64,
    pub min_position: f64,
    pub max_position: f64,
}

impl FirstOrderActuator {
    /// # Errors
    ///
    /// Returns an error if `tau` or `rate_limit` is not positive, or if the
    /// position limits are not ordered.
    pub fn new(tau: f64, rate_limit: f64, min_position: f64, max_position: f64) -> SimResult<Self> {
        if !is_positive(tau) {
            return Err(SimError::InvalidArg {
                what: "actuator tau must be positive",
            });
        }
        if !is_positive(rate_limit) {
            return Err(SimError::InvalidArg {
                what: "actuator rate_limit must be positive",
            });
        }
        if min_position.is_nan() || max_position.is_nan() || min_position >= max_position {
            return Err(SimError::InvalidArg {
                what: "actuator min_position must be below max_position",
            });
        }
        Ok(Self {
            tau,
            rate_limit,
            min_position,
            max_position,
        })
    }

    /// Position derivative clamped to `[-rate_limit, rate_limit]`.
    pub fn dpdt(&self, position: f64, command: f64) -> f64 {
        let raw = (command - position) / self.tau;
        raw.clamp(-self.rate_limit, self.rate_limit)
    }

    /// Advance the position by `dt` with explicit Euler.
    pub fn step(&self, state: &ActuatorState, dt: f64, command: f64) -> ActuatorState {
        let next = state.position + self.dpdt(state.position, command) * dt;
        ActuatorState {
            position: next.clamp(self.min_position, self.max_position),
        }
    }
}
