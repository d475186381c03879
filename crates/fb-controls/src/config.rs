//! Controller configuration.

use fb_core::{Real, Time, ensure_finite, s, seconds};
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// Gains, limits and time constants of a controller.
///
/// Fixed for the lifetime of a controller instance. Missing fields take the
/// [`Default`] values when deserialised, so a scenario file only needs to
/// list what it changes.
///
/// The configuration is not checked on every update; call
/// [`validate`](Self::validate) once when it is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// P part gain.
    pub proportional_gain: Real,
    /// I part gain.
    pub integral_gain: Real,
    /// D part gain.
    pub derivative_gain: Real,
    /// Gain on the gap between fed-back and unsaturated output. Zero disables anti-windup.
    pub anti_windup_gain: Real,
    /// Time constant over which a discharged integral decays to zero.
    pub integral_discharge_time_constant: Time,
    /// D part low-pass filter time constant; cut-off frequency is its inverse.
    pub low_pass_time_constant: Time,
    /// Lower output limit.
    pub min_output: Real,
    /// Upper output limit.
    pub max_output: Real,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            proportional_gain: 0.0,
            integral_gain: 0.0,
            derivative_gain: 0.0,
            anti_windup_gain: 0.0,
            integral_discharge_time_constant: s(10.0),
            low_pass_time_constant: s(1.0),
            min_output: Real::NEG_INFINITY,
            max_output: Real::INFINITY,
        }
    }
}

impl ControllerConfig {
    /// Create a configuration with zero gains and unbounded output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the P, I and D gains at once.
    pub fn with_gains(mut self, kp: Real, ki: Real, kd: Real) -> Self {
        self.proportional_gain = kp;
        self.integral_gain = ki;
        self.derivative_gain = kd;
        self
    }

    pub fn with_proportional_gain(mut self, kp: Real) -> Self {
        self.proportional_gain = kp;
        self
    }

    pub fn with_integral_gain(mut self, ki: Real) -> Self {
        self.integral_gain = ki;
        self
    }

    pub fn with_derivative_gain(mut self, kd: Real) -> Self {
        self.derivative_gain = kd;
        self
    }

    pub fn with_anti_windup_gain(mut self, kaw: Real) -> Self {
        self.anti_windup_gain = kaw;
        self
    }

    pub fn with_low_pass_time_constant(mut self, tau: Time) -> Self {
        self.low_pass_time_constant = tau;
        self
    }

    pub fn with_integral_discharge_time_constant(mut self, tau: Time) -> Self {
        self.integral_discharge_time_constant = tau;
        self
    }

    /// Set the discharge speed as a decay rate in 1/s instead of a time constant.
    ///
    /// A rate of `0.1` removes 0.1 % of the integral every 10 ms.
    pub fn with_integral_discharge_rate(mut self, rate_per_s: Real) -> Self {
        self.integral_discharge_time_constant = s(1.0 / rate_per_s);
        self
    }

    /// Set the output limits (min, max).
    pub fn with_output_limits(mut self, min: Real, max: Real) -> Self {
        self.min_output = min;
        self.max_output = max;
        self
    }

    /// Derivative filter cut-off frequency (1/s).
    pub fn low_pass_cutoff_frequency(&self) -> Real {
        1.0 / seconds(self.low_pass_time_constant)
    }

    /// Integral discharge rate (1/s).
    pub fn integral_discharge_rate(&self) -> Real {
        1.0 / seconds(self.integral_discharge_time_constant)
    }

    /// Check the configuration once, before it is used in a control loop.
    ///
    /// # Errors
    ///
    /// - any gain is NaN or infinite
    /// - a time constant is not a positive finite number
    /// - an output limit is NaN, or `min_output > max_output`
    pub fn validate(&self) -> ControlResult<()> {
        ensure_finite(self.proportional_gain, "proportional_gain")?;
        ensure_finite(self.integral_gain, "integral_gain")?;
        ensure_finite(self.derivative_gain, "derivative_gain")?;
        ensure_finite(self.anti_windup_gain, "anti_windup_gain")?;

        let low_pass = ensure_finite(seconds(self.low_pass_time_constant), "low_pass_time_constant")?;
        if low_pass <= 0.0 {
            return Err(ControlError::InvalidArg {
                what: "low_pass_time_constant must be positive",
            });
        }
        let discharge = ensure_finite(
            seconds(self.integral_discharge_time_constant),
            "integral_discharge_time_constant",
        )?;
        if discharge <= 0.0 {
            return Err(ControlError::InvalidArg {
                what: "integral_discharge_time_constant must be positive",
            });
        }

        if self.min_output.is_nan() || self.max_output.is_nan() || self.min_output > self.max_output
        {
            return Err(ControlError::InvalidLimits {
                min: self.min_output,
                max: self.max_output,
            });
        }
        Ok(())
    }
}
