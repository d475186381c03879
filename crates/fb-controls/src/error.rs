//! Error types for controller configuration.

use fb_core::FbError;
use thiserror::Error;

/// Result type for control system operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors raised while checking a controller configuration.
///
/// The update path itself never fails; these only come out of
/// [`ControllerConfig::validate`](crate::ControllerConfig::validate).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A parameter is NaN or infinite.
    #[error("Non-finite parameter {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    /// Output bounds are inverted or NaN.
    #[error("Invalid output limits: min {min} > max {max}")]
    InvalidLimits { min: f64, max: f64 },
}

impl From<FbError> for ControlError {
    fn from(e: FbError) -> Self {
        match e {
            FbError::NonFinite { what, value } => ControlError::NonFinite { what, value },
        }
    }
}
