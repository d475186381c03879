//! Per-tick controller inputs.

use fb_core::{Real, Time, seconds};

/// Inputs to one update of an [`AntiWindupController`](crate::AntiWindupController).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerInput {
    /// Value the controlled signal should reach.
    pub reference_signal: Real,
    /// Measured value of the controlled signal.
    pub actual_signal: Real,
    /// Contribution of a feed-forward path, added to the output as is.
    pub feed_forward_signal: Real,
    /// Time elapsed since the previous update.
    pub sampling_interval: Time,
}

impl ControllerInput {
    pub fn new(reference_signal: Real, actual_signal: Real, sampling_interval: Time) -> Self {
        Self {
            reference_signal,
            actual_signal,
            feed_forward_signal: 0.0,
            sampling_interval,
        }
    }

    pub fn with_feed_forward(mut self, feed_forward_signal: Real) -> Self {
        self.feed_forward_signal = feed_forward_signal;
        self
    }

    /// Whether the update may touch the controller state.
    ///
    /// A NaN or infinite measurement or reference, a NaN feed-forward or a
    /// non-finite sampling interval makes the update a no-op.
    pub fn is_usable(&self) -> bool {
        self.reference_signal.is_finite()
            && self.actual_signal.is_finite()
            && !self.feed_forward_signal.is_nan()
            && seconds(self.sampling_interval).is_finite()
    }
}

/// Inputs to one update of a [`TrackingController`](crate::TrackingController).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingControllerInput {
    pub reference_signal: Real,
    pub actual_signal: Real,
    pub feed_forward_signal: Real,
    /// Signal the actuator actually received, e.g. from another controller or an operator.
    pub applied_control_signal: Real,
    pub sampling_interval: Time,
}

impl TrackingControllerInput {
    pub fn new(
        reference_signal: Real,
        actual_signal: Real,
        applied_control_signal: Real,
        sampling_interval: Time,
    ) -> Self {
        Self {
            reference_signal,
            actual_signal,
            feed_forward_signal: 0.0,
            applied_control_signal,
            sampling_interval,
        }
    }

    pub fn with_feed_forward(mut self, feed_forward_signal: Real) -> Self {
        self.feed_forward_signal = feed_forward_signal;
        self
    }

    /// The input without the applied signal.
    pub fn controller_input(&self) -> ControllerInput {
        ControllerInput {
            reference_signal: self.reference_signal,
            actual_signal: self.actual_signal,
            feed_forward_signal: self.feed_forward_signal,
            sampling_interval: self.sampling_interval,
        }
    }
}
