//! Common interface of the controller variants.

use chrono::{DateTime, Utc};
use fb_core::{Real, Time};

use crate::config::ControllerConfig;
use crate::input::ControllerInput;
use crate::saturation::FeedbackSignal;
use crate::snapshot::StateSnapshot;
use crate::state::ControllerState;

/// Operations every controller supports, independent of where its
/// anti-windup feedback comes from.
///
/// Lets a mode manager hold controllers of either variant and hand control
/// between them.
pub trait Controller {
    /// Configuration the controller was built with.
    fn config(&self) -> &ControllerConfig;

    /// Current state.
    fn state(&self) -> &ControllerState;

    /// Run one update with an explicit feedback source and return the control signal.
    ///
    /// Unusable input leaves the state untouched and returns the held output.
    fn update_with_feedback(&mut self, input: &ControllerInput, feedback: FeedbackSignal) -> Real;

    /// Return to the zero state; the configuration is kept.
    fn reset(&mut self);

    /// Let the integral fade out over `dt`, see [`discharge`](crate::discharge::discharge).
    fn discharge_integral(&mut self, dt: Time);

    /// State copy stamped with `time`.
    fn snapshot(&self, time: DateTime<Utc>) -> StateSnapshot;
}
