//! Integral discharge for deactivated controllers.

use fb_core::{Time, discharge_factor, seconds};

use crate::config::ControllerConfig;
use crate::state::ControllerState;

/// State after discharging the integral for `dt`.
///
/// The integrand is zeroed so the next update starts integrating afresh, and
/// the integral decays by `clamp(1 - dt / T, 0, 1)` where `T` is the
/// configured discharge time constant. An interval of at least `T` empties
/// the integral; a zero or negative interval leaves it as it is. Every other
/// field is kept.
pub fn discharge(config: &ControllerConfig, state: &ControllerState, dt: Time) -> ControllerState {
    let factor = discharge_factor(seconds(dt), seconds(config.integral_discharge_time_constant));
    let next = ControllerState {
        control_error_integrand: 0.0,
        control_error_integral: factor * state.control_error_integral,
        ..*state
    };
    tracing::trace!(
        factor,
        integral = next.control_error_integral,
        "discharged controller integral"
    );
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_core::{ms, s};

    fn loaded_state() -> ControllerState {
        ControllerState {
            control_error: 5.0,
            control_error_integrand: 10.0,
            control_error_integral: 1000.0,
            control_error_derivative: 500.0,
            unsaturated_control_signal: 1.0,
            control_signal: 1.0,
        }
    }

    #[test]
    fn decays_integral_and_zeroes_integrand() {
        let config = ControllerConfig::new().with_integral_discharge_time_constant(s(10.0));
        let next = discharge(&config, &loaded_state(), ms(10.0));
        assert!((next.control_error_integral - 999.0).abs() < 1e-9);
        assert_eq!(next.control_error_integrand, 0.0);
        assert_eq!(next.control_error, 5.0);
        assert_eq!(next.control_error_derivative, 500.0);
        assert_eq!(next.control_signal, 1.0);
    }

    #[test]
    fn long_interval_empties_integral() {
        let config = ControllerConfig::new().with_integral_discharge_time_constant(s(10.0));
        let next = discharge(&config, &loaded_state(), s(25.0));
        assert_eq!(next.control_error_integral, 0.0);
    }

    #[test]
    fn non_positive_interval_keeps_integral() {
        let config = ControllerConfig::new();
        let next = discharge(&config, &loaded_state(), s(0.0));
        assert_eq!(next.control_error_integral, 1000.0);
        assert_eq!(next.control_error_integrand, 0.0);
        let next = discharge(&config, &loaded_state(), s(-1.0));
        assert_eq!(next.control_error_integral, 1000.0);
    }
}
