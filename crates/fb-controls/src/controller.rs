//! The update skeleton and the saturating anti-windup controller.
//!
//! One update, executed atomically:
//! 1. skip the call if the measurement or reference is NaN or infinite
//! 2. `error = reference - actual`
//! 3. `integral += previous integrand * dt` (backward Euler)
//! 4. low-pass filtered derivative of the error
//! 5. `u = kp * error + ki * integral + kd * derivative + feed_forward`
//! 6. `control_signal = clamp(u, min_output, max_output)`
//! 7. `integrand = error + kaw * (feedback - u)`
//! 8. clamp every stored value into the finite range and commit

use chrono::{DateTime, Utc};
use fb_core::{
    Real, Time, backward_euler_step, clamp_finite, low_pass_derivative_step, saturating_mul,
    saturating_sum, seconds,
};

use crate::config::ControllerConfig;
use crate::discharge::discharge;
use crate::error::ControlResult;
use crate::input::ControllerInput;
use crate::saturation::{FeedbackSignal, Saturation};
use crate::snapshot::StateSnapshot;
use crate::state::ControllerState;
use crate::traits::Controller;

impl ControllerConfig {
    /// Compute the state that follows `state` after one update.
    ///
    /// Returns `None` when the input is unusable (see
    /// [`ControllerInput::is_usable`]) or an applied feedback signal is NaN;
    /// the caller then keeps the previous state.
    pub fn step(
        &self,
        state: &ControllerState,
        input: &ControllerInput,
        feedback: FeedbackSignal,
    ) -> Option<ControllerState> {
        if !input.is_usable() {
            return None;
        }
        if matches!(feedback, FeedbackSignal::Applied(applied) if applied.is_nan()) {
            return None;
        }

        let dt = seconds(input.sampling_interval);
        let error = clamp_finite(input.reference_signal - input.actual_signal);
        let integral = backward_euler_step(
            state.control_error_integrand,
            dt,
            state.control_error_integral,
        );
        let derivative = low_pass_derivative_step(
            error,
            state.control_error,
            state.control_error_derivative,
            dt,
            seconds(self.low_pass_time_constant),
        );
        let unsaturated = saturating_sum(&[
            saturating_mul(self.proportional_gain, error),
            saturating_mul(self.integral_gain, integral),
            saturating_mul(self.derivative_gain, derivative),
            input.feed_forward_signal,
        ]);
        let outcome = Saturation::from_config(self).apply(error, unsaturated, feedback);

        Some(ControllerState {
            control_error: error,
            control_error_integrand: outcome.integrand,
            control_error_integral: integral,
            control_error_derivative: derivative,
            unsaturated_control_signal: unsaturated,
            control_signal: outcome.control_signal,
        })
    }
}

/// PID controller with low-pass filtered derivative, feed-forward, saturated
/// output and anti-windup.
///
/// The anti-windup feedback is the controller's own saturated output, so the
/// integral stops growing once the output sits at a limit. With
/// `anti_windup_gain = 0` it is a plain clamped PID controller.
///
/// # Example
///
/// ```
/// use fb_controls::{AntiWindupController, Controller, ControllerConfig, ControllerInput};
/// use fb_core::ms;
///
/// let config = ControllerConfig::new()
///     .with_proportional_gain(1.0)
///     .with_output_limits(-10.0, 10.0);
/// let mut controller = AntiWindupController::new(config);
///
/// let u = controller.update(&ControllerInput::new(50.0, 0.0, ms(10.0)));
/// assert_eq!(u, 10.0);
/// assert_eq!(controller.state().control_error, 50.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AntiWindupController {
    config: ControllerConfig,
    state: ControllerState,
}

impl AntiWindupController {
    /// Create a controller in the zero state. The configuration is taken as is.
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            state: ControllerState::default(),
        }
    }

    /// Create a controller after validating its configuration.
    pub fn try_new(config: ControllerConfig) -> ControlResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Resume from a previously captured state.
    pub fn with_state(mut self, state: ControllerState) -> Self {
        self.state = state;
        self
    }

    /// Run one update and return the (possibly held) control signal.
    pub fn update(&mut self, input: &ControllerInput) -> Real {
        self.update_with_feedback(input, FeedbackSignal::Saturated)
    }
}

impl Controller for AntiWindupController {
    fn config(&self) -> &ControllerConfig {
        &self.config
    }

    fn state(&self) -> &ControllerState {
        &self.state
    }

    fn update_with_feedback(&mut self, input: &ControllerInput, feedback: FeedbackSignal) -> Real {
        match self.config.step(&self.state, input, feedback) {
            Some(next) => self.state = next,
            None => tracing::trace!(
                reference = input.reference_signal,
                actual = input.actual_signal,
                "skipping controller update on non-finite input"
            ),
        }
        self.state.control_signal
    }

    fn reset(&mut self) {
        self.state = ControllerState::default();
    }

    fn discharge_integral(&mut self, dt: Time) {
        self.state = discharge(&self.config, &self.state, dt);
    }

    fn snapshot(&self, time: DateTime<Utc>) -> StateSnapshot {
        StateSnapshot::new(time, &self.state)
    }
}
