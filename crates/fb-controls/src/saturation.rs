//! Output saturation and anti-windup correction.
//!
//! While the output is saturated, integrating the raw control error winds the
//! integral up and causes overshoot once the error changes sign. Instead the
//! controller integrates a corrected integrand
//!
//! `integrand = error + anti_windup_gain * (feedback - unsaturated)`
//!
//! which drives the integral toward the value that reproduces the fed-back
//! signal. With the controller's own saturated output as feedback this is the
//! actuator saturation model of Åström and Murray (Feedback Systems, ch. 6);
//! with the signal actually applied to the actuator it becomes tracking mode,
//! which is what makes bumpless transfer possible.

use fb_core::{Real, clamp_finite, saturate, saturating_add, saturating_mul};
use serde::{Deserialize, Serialize};

use crate::config::ControllerConfig;

/// Source of the signal compared against the unsaturated output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FeedbackSignal {
    /// The controller's own saturated output of the current update.
    Saturated,
    /// A signal observed at the actuator, e.g. what another controller commands.
    Applied(Real),
}

/// Result of saturating one update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationOutcome {
    /// Output clamped to the limits.
    pub control_signal: Real,
    /// Integrand for the next update.
    pub integrand: Real,
}

/// Output limits together with the anti-windup gain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Saturation {
    pub min_output: Real,
    pub max_output: Real,
    pub anti_windup_gain: Real,
}

impl Saturation {
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            min_output: config.min_output,
            max_output: config.max_output,
            anti_windup_gain: config.anti_windup_gain,
        }
    }

    /// Clamp `unsaturated` to the limits.
    pub fn clamp(&self, unsaturated: Real) -> Real {
        saturate(unsaturated, self.min_output, self.max_output)
    }

    /// Saturate the output and compute the anti-windup corrected integrand.
    ///
    /// `unsaturated` must already be finite; an applied feedback signal is
    /// clamped to the finite range.
    pub fn apply(&self, error: Real, unsaturated: Real, feedback: FeedbackSignal) -> SaturationOutcome {
        let control_signal = self.clamp(unsaturated);
        let fed_back = match feedback {
            FeedbackSignal::Saturated => control_signal,
            FeedbackSignal::Applied(applied) => clamp_finite(applied),
        };
        let gap = clamp_finite(fed_back - unsaturated);
        let integrand = saturating_add(error, saturating_mul(self.anti_windup_gain, gap));
        SaturationOutcome {
            control_signal,
            integrand,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saturation(gain: Real) -> Saturation {
        Saturation {
            min_output: -10.0,
            max_output: 10.0,
            anti_windup_gain: gain,
        }
    }

    #[test]
    fn inside_limits_integrand_is_error() {
        let out = saturation(10.0).apply(2.0, 5.0, FeedbackSignal::Saturated);
        assert_eq!(out.control_signal, 5.0);
        assert_eq!(out.integrand, 2.0);
    }

    #[test]
    fn saturated_output_bleeds_integrand() {
        // 50 requested, 10 delivered: integrand = 3 + 0.5 * (10 - 50)
        let out = saturation(0.5).apply(3.0, 50.0, FeedbackSignal::Saturated);
        assert_eq!(out.control_signal, 10.0);
        assert_eq!(out.integrand, -17.0);
    }

    #[test]
    fn zero_gain_disables_correction() {
        let out = saturation(0.0).apply(3.0, 50.0, FeedbackSignal::Saturated);
        assert_eq!(out.control_signal, 10.0);
        assert_eq!(out.integrand, 3.0);
    }

    #[test]
    fn applied_signal_replaces_own_output() {
        // The applied signal is compared even though the output is not saturated.
        let out = saturation(2.0).apply(0.0, 4.0, FeedbackSignal::Applied(1.0));
        assert_eq!(out.control_signal, 4.0);
        assert_eq!(out.integrand, -6.0);
    }

    #[test]
    fn extreme_gap_stays_finite() {
        let out = saturation(0.0).apply(
            Real::MAX,
            Real::MAX,
            FeedbackSignal::Applied(Real::NEG_INFINITY),
        );
        assert!(out.integrand.is_finite());
        assert_eq!(out.control_signal, 10.0);
    }
}
