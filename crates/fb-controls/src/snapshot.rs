//! Timestamped state records for telemetry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::ControllerState;

/// Read-only copy of a controller state, stamped with a caller supplied time.
///
/// Values are single precision, the width telemetry channels carry. The
/// controller itself is unaware of wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub time: DateTime<Utc>,
    pub error: f32,
    /// Anti-windup corrected integrand.
    pub integral_error: f32,
    pub integral_state: f32,
    pub derivative_state: f32,
    pub control_signal: f32,
    pub unsaturated_control_signal: f32,
}

/// `f64` to `f32`, saturating at `±f32::MAX` instead of overflowing to infinity.
fn narrow(v: f64) -> f32 {
    v.clamp(f64::from(f32::MIN), f64::from(f32::MAX)) as f32
}

impl StateSnapshot {
    pub fn new(time: DateTime<Utc>, state: &ControllerState) -> Self {
        Self {
            time,
            error: narrow(state.control_error),
            integral_error: narrow(state.control_error_integrand),
            integral_state: narrow(state.control_error_integral),
            derivative_state: narrow(state.control_error_derivative),
            control_signal: narrow(state.control_signal),
            unsaturated_control_signal: narrow(state.unsaturated_control_signal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn snapshot_copies_state() {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let state = ControllerState {
            control_error: 1.5,
            control_error_integrand: 0.5,
            control_error_integral: 2.0,
            control_error_derivative: -0.25,
            unsaturated_control_signal: 12.0,
            control_signal: 10.0,
        };
        let snapshot = StateSnapshot::new(time, &state);
        assert_eq!(snapshot.time, time);
        assert_eq!(snapshot.error, 1.5);
        assert_eq!(snapshot.integral_error, 0.5);
        assert_eq!(snapshot.integral_state, 2.0);
        assert_eq!(snapshot.derivative_state, -0.25);
        assert_eq!(snapshot.control_signal, 10.0);
        assert_eq!(snapshot.unsaturated_control_signal, 12.0);
    }

    #[test]
    fn extreme_state_survives_json() {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let state = ControllerState {
            control_error: f64::MAX,
            control_error_integrand: -f64::MAX,
            control_error_integral: 1e300,
            control_error_derivative: 0.0,
            unsaturated_control_signal: f64::MAX,
            control_signal: 10.0,
        };
        let snapshot = StateSnapshot::new(time, &state);
        assert_eq!(snapshot.error, f32::MAX);
        assert_eq!(snapshot.integral_error, f32::MIN);
        assert_eq!(snapshot.integral_state, f32::MAX);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: StateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
