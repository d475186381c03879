//! Mutable controller state.

use fb_core::Real;
use serde::{Deserialize, Serialize};

/// State shared by every controller variant.
///
/// Only an update, a reset or an integral discharge change it. Each update
/// overwrites every field; the default is the all-zero state a controller
/// starts from and returns to on reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    /// Reference minus actual signal of the last update.
    pub control_error: Real,
    /// Control error plus the anti-windup correction; this is what gets integrated.
    pub control_error_integrand: Real,
    /// Backward-Euler integral of the integrand.
    pub control_error_integral: Real,
    /// Low-pass filtered time derivative of the control error.
    pub control_error_derivative: Real,
    /// Sum of P, I, D and feed-forward terms before saturation.
    pub unsaturated_control_signal: Real,
    /// Saturated controller output.
    pub control_signal: Real,
}

impl ControllerState {
    /// True when no field is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        [
            self.control_error,
            self.control_error_integrand,
            self.control_error_integral,
            self.control_error_derivative,
            self.unsaturated_control_signal,
            self.control_signal,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}
