use fb_controls::{
    AntiWindupController, Controller, ControllerConfig, ControllerInput, ControllerState,
    TrackingController, TrackingControllerInput,
};
use fb_core::{Real, Time, ms, s};

const DELTA: f64 = 1e-3;

fn dt() -> Time {
    ms(10.0)
}

fn saturated_pid() -> ControllerConfig {
    ControllerConfig::new()
        .with_gains(1.0, 10.0, 0.01)
        .with_anti_windup_gain(10.0)
        .with_low_pass_time_constant(s(1.0))
        .with_integral_discharge_time_constant(s(10.0))
        .with_output_limits(-10.0, 10.0)
}

#[test]
fn p_controller_saturates_large_error() {
    let config = ControllerConfig::new()
        .with_proportional_gain(1.0)
        .with_output_limits(-10.0, 10.0);
    let mut c = AntiWindupController::new(config);

    let u = c.update(&ControllerInput::new(50.0, 0.0, dt()));

    assert_eq!(u, 10.0);
    assert_eq!(c.state().control_signal, 10.0);
    assert_eq!(c.state().control_error, 50.0);
}

#[test]
fn pid_converges_on_reachable_reference() {
    let mut c = AntiWindupController::new(saturated_pid());
    let reference = 5.0;

    // The plant reproduces the previous command.
    for _ in 0..500 {
        let actual = c.state().control_signal;
        c.update(&ControllerInput::new(reference, actual, dt()));
    }

    let state = c.state();
    assert!(state.control_error.abs() < DELTA);
    assert!((state.control_signal - reference).abs() < DELTA);
    assert!((state.control_error_integral * c.config().integral_gain - reference).abs() < DELTA);
    assert!(state.control_error_integrand.abs() < DELTA);
    assert!((state.control_error_derivative * c.config().derivative_gain).abs() < DELTA);
}

#[test]
fn integral_compensates_feed_forward_within_limits() {
    let config = ControllerConfig::new()
        .with_integral_gain(10.0)
        .with_low_pass_time_constant(s(1.0))
        .with_output_limits(-10.0, 10.0);

    for (feed_forward, expected_integral) in [(2.0, 0.5 - 0.2), (15.0, 0.5 - 1.5)] {
        let mut c = AntiWindupController::new(config);
        for _ in 0..500 {
            let actual = c.state().control_signal;
            c.update(&ControllerInput::new(5.0, actual, dt()).with_feed_forward(feed_forward));
            assert!(c.state().control_signal <= config.max_output);
        }
        let state = c.state();
        assert!(state.control_error.abs() < DELTA);
        assert!((state.control_signal - 5.0).abs() < DELTA);
        assert!((state.control_error_integral - expected_integral).abs() < DELTA);
    }
}

#[test]
fn faulty_measurements_never_produce_non_finite_state() {
    let config = ControllerConfig::new()
        .with_integral_gain(10.0)
        .with_anti_windup_gain(0.01)
        .with_low_pass_time_constant(s(1.0))
        .with_output_limits(-10.0, 10.0);

    for actual in [-Real::MAX, Real::MAX] {
        let mut c = AntiWindupController::new(config);
        let mut tracking = TrackingController::new(config);
        for _ in 0..220 {
            c.update(&ControllerInput::new(5.0, actual, dt()).with_feed_forward(2.0));
            tracking
                .update(&TrackingControllerInput::new(5.0, actual, 0.0, dt()).with_feed_forward(2.0));
        }
        for state in [c.state(), tracking.state()] {
            assert!(state.is_finite());
            assert!(state.control_signal >= -10.0 && state.control_signal <= 10.0);
        }
    }
}

#[test]
fn reset_is_idempotent() {
    let mut c = AntiWindupController::new(saturated_pid()).with_state(ControllerState {
        control_error: 5.0,
        control_error_integral: 5.0,
        control_error_derivative: 5.0,
        control_signal: 5.0,
        control_error_integrand: 5.0,
        unsaturated_control_signal: 5.0,
    });
    c.reset();
    let once = *c.state();
    c.reset();
    assert_eq!(once, ControllerState::default());
    assert_eq!(*c.state(), once);
}

#[test]
fn discharge_offloads_integral_term() {
    let config = ControllerConfig::new()
        .with_gains(1.0, 0.01, 10.0)
        .with_anti_windup_gain(0.5)
        .with_integral_discharge_rate(0.1)
        .with_output_limits(-10.0, 10.0);
    let mut c = AntiWindupController::new(config).with_state(ControllerState {
        control_error: 5.0,
        control_error_integral: 1000.0,
        control_error_derivative: 500.0,
        control_signal: 1.0,
        control_error_integrand: 10.0,
        unsaturated_control_signal: 0.0,
    });

    c.discharge_integral(dt());

    let state = c.state();
    assert!((state.control_error_integral - 999.0).abs() < 1e-9);
    assert_eq!(state.control_error_integrand, 0.0);
    assert_eq!(state.control_error, 5.0);
    assert_eq!(state.control_error_derivative, 500.0);
    assert_eq!(state.control_signal, 1.0);
}

#[test]
fn tracking_output_follows_held_applied_signal() {
    let config = ControllerConfig::new()
        .with_gains(1.0, 1.0, 0.0)
        .with_anti_windup_gain(2.0)
        .with_output_limits(-10.0, 10.0);
    let applied = 3.0;

    // Zero error: the output settles on the applied signal itself.
    let mut c = TrackingController::new(config);
    for _ in 0..1000 {
        c.update(&TrackingControllerInput::new(2.0, 2.0, applied, dt()));
    }
    assert!((c.state().unsaturated_control_signal - applied).abs() < DELTA);

    // Constant error: offset by error / anti_windup_gain.
    let mut c = TrackingController::new(config);
    for _ in 0..1000 {
        c.update(&TrackingControllerInput::new(1.0, 0.0, applied, dt()));
    }
    let expected = applied + 1.0 / config.anti_windup_gain;
    assert!((c.state().unsaturated_control_signal - expected).abs() < DELTA);
    assert!(c.state().control_error_integrand.abs() < DELTA);
}

/// First-order plant `y' = (u - y) / 0.1 s`, advanced by one controller period.
fn plant_step(y: Real, u: Real) -> Real {
    y + 0.01 / 0.1 * (u - y)
}

fn handover_bump(secondary_config: ControllerConfig) -> Real {
    let primary_config = ControllerConfig::new()
        .with_gains(1.0, 5.0, 0.0)
        .with_anti_windup_gain(1.0)
        .with_output_limits(-10.0, 10.0);
    let mut primary = AntiWindupController::new(primary_config);
    let mut secondary = TrackingController::new(secondary_config);
    let reference = 2.0;
    let mut y = 0.0;
    let mut applied = 0.0;

    for _ in 0..500 {
        applied = primary.update(&ControllerInput::new(reference, y, dt()));
        secondary.update(&TrackingControllerInput::new(reference, y, applied, dt()));
        y = plant_step(y, applied);
    }

    // Hand over: the secondary now drives the plant.
    let first = secondary.update(&TrackingControllerInput::new(reference, y, applied, dt()));
    (first - applied).abs()
}

#[test]
fn tracking_secondary_takes_over_without_bump() {
    let secondary = ControllerConfig::new()
        .with_gains(0.5, 2.0, 0.0)
        .with_anti_windup_gain(3.0)
        .with_output_limits(-10.0, 10.0);
    assert!(handover_bump(secondary) < DELTA);
}

#[test]
fn secondary_without_tracking_bumps() {
    let secondary = ControllerConfig::new()
        .with_gains(0.5, 2.0, 0.0)
        .with_anti_windup_gain(0.0)
        .with_output_limits(-10.0, 10.0);
    assert!(handover_bump(secondary) > 0.5);
}
