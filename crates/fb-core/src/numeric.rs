use crate::{FbError, FbResult};

/// Floating point type used throughout system
pub type Real = f64;

/// Largest finite magnitude a stored controller quantity may take.
pub const REAL_MAX: Real = Real::MAX;

pub fn ensure_finite(v: Real, what: &'static str) -> FbResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FbError::NonFinite { what, value: v })
    }
}

/// Clamp into `[-REAL_MAX, REAL_MAX]`, turning overflow into the largest finite value.
///
/// NaN is passed through untouched.
#[inline]
pub fn clamp_finite(v: Real) -> Real {
    v.clamp(-REAL_MAX, REAL_MAX)
}

/// `a + b`, clamped so that it never overflows to infinity.
#[inline]
pub fn saturating_add(a: Real, b: Real) -> Real {
    clamp_finite(a + b)
}

/// `gain * v`, clamped so that it never overflows to infinity.
#[inline]
pub fn saturating_mul(gain: Real, v: Real) -> Real {
    clamp_finite(gain * v)
}

/// Sum of `terms`, clamping after every addition.
///
/// Keeps `MAX + MAX - MAX` finite where a plain sum would reach `inf - inf`.
pub fn saturating_sum(terms: &[Real]) -> Real {
    terms
        .iter()
        .fold(0.0, |acc, &term| saturating_add(acc, clamp_finite(term)))
}

/// Limit `v` to `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics: inverted bounds resolve to `min`.
#[inline]
pub fn saturate(v: Real, min: Real, max: Real) -> Real {
    v.min(max).max(min)
}

/// One backward-Euler step: `integral + integrand * dt`.
#[inline]
pub fn backward_euler_step(integrand: Real, dt: Real, integral: Real) -> Real {
    saturating_add(saturating_mul(integrand, dt), integral)
}

/// One step of a first-order low-pass filtered difference quotient.
///
/// Discretises `tau * y' + y = de/dt` with backward Euler:
/// `y = ((e - e_prev) / tau + y_prev) / (dt / tau + 1)`.
/// Converges to `(e - e_prev) / dt` as `tau -> 0`.
///
/// At `dt == -tau` the step is undefined and the previous output is held.
pub fn low_pass_derivative_step(
    error: Real,
    previous_error: Real,
    previous_derivative: Real,
    dt: Real,
    tau: Real,
) -> Real {
    let delta = clamp_finite(error - previous_error);
    let numerator = saturating_add(clamp_finite(delta / tau), previous_derivative);
    let denominator = dt / tau + 1.0;
    if denominator == 0.0 {
        return previous_derivative;
    }
    clamp_finite(numerator / denominator)
}

/// Fraction of an integral that survives discharging for `dt` with time constant `tau`.
///
/// `clamp(1 - dt / tau, 0, 1)`: zero once `dt >= tau`, one for `dt <= 0`.
#[inline]
pub fn discharge_factor(dt: Real, tau: Real) -> Real {
    (1.0 - dt / tau).min(1.0).max(0.0)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn saturate_stays_within_bounds(
            v in prop::num::f64::ANY,
            lo in -1e6_f64..0.0,
            hi in 0.0_f64..1e6,
        ) {
            prop_assume!(!v.is_nan());
            let out = saturate(v, lo, hi);
            prop_assert!(out >= lo && out <= hi);
        }

        #[test]
        fn saturating_sum_is_finite(
            terms in prop::collection::vec(prop::num::f64::NORMAL | prop::num::f64::INFINITE, 1..6)
        ) {
            prop_assert!(saturating_sum(&terms).is_finite());
        }

        #[test]
        fn low_pass_derivative_is_finite(
            error in -1e6_f64..1e6,
            previous_error in -1e6_f64..1e6,
            previous_derivative in -1e6_f64..1e6,
            tau in 1e-3_f64..10.0,
            dt_over_tau in prop_oneof![Just(-1.0), Just(0.0), -5.0_f64..5.0],
        ) {
            let d = low_pass_derivative_step(
                error,
                previous_error,
                previous_derivative,
                dt_over_tau * tau,
                tau,
            );
            prop_assert!(d.is_finite());
        }

        #[test]
        fn discharge_factor_in_unit_interval(dt in -100.0_f64..100.0, tau in 1e-3_f64..100.0) {
            let f = discharge_factor(dt, tau);
            prop_assert!((0.0..=1.0).contains(&f));
        }
    }
}
