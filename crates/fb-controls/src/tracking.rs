//! Tracking-mode controller for bumpless transfer.
//!
//! A controller that is not driving the actuator keeps updating with the
//! signal the actuator really receives as anti-windup feedback. Its integral
//! then settles where its own output agrees with the applied signal, so when
//! control is handed to it the command continues without a step.

use chrono::{DateTime, Utc};
use fb_core::{Real, Time};

use crate::config::ControllerConfig;
use crate::controller::AntiWindupController;
use crate::error::ControlResult;
use crate::input::{ControllerInput, TrackingControllerInput};
use crate::saturation::FeedbackSignal;
use crate::snapshot::StateSnapshot;
use crate::state::ControllerState;
use crate::traits::Controller;

/// PID controller whose integrand is corrected toward an externally applied signal.
///
/// Same update as [`AntiWindupController`]; the output is still clamped to
/// the configured limits, only the anti-windup feedback differs.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingController {
    inner: AntiWindupController,
}

impl TrackingController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            inner: AntiWindupController::new(config),
        }
    }

    pub fn try_new(config: ControllerConfig) -> ControlResult<Self> {
        Ok(Self {
            inner: AntiWindupController::try_new(config)?,
        })
    }

    pub fn with_state(self, state: ControllerState) -> Self {
        Self {
            inner: self.inner.with_state(state),
        }
    }

    /// Run one update tracking `input.applied_control_signal`.
    pub fn update(&mut self, input: &TrackingControllerInput) -> Real {
        self.inner.update_with_feedback(
            &input.controller_input(),
            FeedbackSignal::Applied(input.applied_control_signal),
        )
    }
}

impl Controller for TrackingController {
    fn config(&self) -> &ControllerConfig {
        self.inner.config()
    }

    fn state(&self) -> &ControllerState {
        self.inner.state()
    }

    fn update_with_feedback(&mut self, input: &ControllerInput, feedback: FeedbackSignal) -> Real {
        self.inner.update_with_feedback(input, feedback)
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn discharge_integral(&mut self, dt: Time) {
        self.inner.discharge_integral(dt);
    }

    fn snapshot(&self, time: DateTime<Utc>) -> StateSnapshot {
        self.inner.snapshot(time)
    }
}
