//! Discrete-time PID controllers with feed-forward, output saturation,
//! anti-windup and bumpless transfer.
//!
//! # Architecture
//!
//! One update skeleton ([`ControllerConfig::step`]) serves every controller:
//! - [`AntiWindupController`] feeds its own saturated output back into the
//!   integrand (actuator saturation model)
//! - [`TrackingController`] feeds back an externally applied signal, so an
//!   idle controller can follow a live one and take over without a bump
//!
//! Both carry the same [`ControllerState`], can discharge their integral on
//! deactivation, and expose a timestamped [`StateSnapshot`] for telemetry.
//!
//! The derivative term is a first-order low-pass filtered difference of the
//! control error and the integral uses backward Euler. Every stored state
//! value is clamped to the finite range of `f64`; measurements that are NaN
//! or infinite leave the controller untouched.

pub mod config;
pub mod controller;
pub mod discharge;
pub mod error;
pub mod input;
pub mod saturation;
pub mod snapshot;
pub mod state;
pub mod tracking;
pub mod traits;

pub use config::ControllerConfig;
pub use controller::AntiWindupController;
pub use error::{ControlError, ControlResult};
pub use input::{ControllerInput, TrackingControllerInput};
pub use saturation::{FeedbackSignal, Saturation, SaturationOutcome};
pub use snapshot::StateSnapshot;
pub use state::ControllerState;
pub use tracking::TrackingController;
pub use traits::Controller;
