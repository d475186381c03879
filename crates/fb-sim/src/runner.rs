//! Closed-loop scenario runner.
//!
//! The plant and actuator are integrated with `plant_dt_s`; the controllers
//! run every `controller_period_s` starting at `t = 0` and their command is
//! held in between. While a hand-over is configured, the controller that is
//! not driving the plant either tracks the applied signal or bleeds off its
//! integral, so that taking control back does not start from stale state.

use fb_controls::{
    AntiWindupController, Controller, ControllerInput, FeedbackSignal, TrackingController,
    TrackingControllerInput,
};
use fb_core::{Real, s};
use tracing::{debug, info, warn};

use crate::actuator::ActuatorState;
use crate::error::{SimError, SimResult};
use crate::sampled::{SampleConfig, ZeroOrderHold};
use crate::scenario::{HandoverDef, IdlePolicy, Scenario, validate_scenario};
use crate::trace::{ActiveController, Trace, TraceRecord};

/// Run `scenario` and record every `record_every`-th controller sample.
pub fn run_scenario(scenario: &Scenario) -> SimResult<Trace> {
    validate_scenario(scenario)?;

    let plant = scenario.plant_model()?;
    let actuator = scenario.actuator_model()?;
    let mut primary = AntiWindupController::try_new(scenario.primary).map_err(|source| {
        SimError::Controller {
            which: "primary",
            source,
        }
    })?;
    let mut secondary = scenario
        .handover
        .as_ref()
        .map(|h| TrackingController::try_new(h.secondary))
        .transpose()
        .map_err(|source| SimError::Controller {
            which: "secondary",
            source,
        })?;

    let dt = scenario.plant_dt_s;
    let period = scenario.controller_period_s;
    let steps = (scenario.duration_s / dt).round() as usize;
    // Start one period early so the first sample lands on t = 0.
    let mut hold = ZeroOrderHold::new(SampleConfig::new(period)?, -period, 0.0);

    let mut output = scenario.plant.initial_output;
    let mut actuator_state = actuator
        .map(|a| ActuatorState {
            position: 0.0_f64.clamp(a.min_position, a.max_position),
        })
        .unwrap_or_default();
    let mut active = ActiveController::Primary;
    let mut samples = 0_usize;
    let mut trace = Trace::new(scenario.name.clone());

    info!(
        scenario = %scenario.name,
        steps,
        handover = scenario.handover.is_some(),
        "starting scenario"
    );

    for k in 0..steps {
        let t = k as f64 * dt;
        let reference = scenario.reference_at(t);
        let measurement = (!scenario.in_dropout(t)).then_some(output);
        let position = actuator.map(|_| actuator_state.position);

        let now_active = active_at(scenario.handover.as_ref(), t);
        if now_active != active {
            info!(
                time_s = t,
                from = active.as_str(),
                to = now_active.as_str(),
                "controller hand-over"
            );
            active = now_active;
        }

        let sampled = hold.update_with(t, |elapsed| {
            let input = ControllerInput::new(
                reference,
                measurement.unwrap_or(Real::NAN),
                s(elapsed),
            )
            .with_feed_forward(scenario.feed_forward);
            let idle_policy = scenario
                .handover
                .as_ref()
                .map_or(IdlePolicy::default(), |h| h.primary_idle);
            tick(
                &mut primary,
                secondary.as_mut(),
                active,
                idle_policy,
                &input,
                position,
            )
        });

        if sampled {
            if measurement.is_none() {
                debug!(time_s = t, "measurement dropped out, holding controller state");
            }
            if samples % scenario.record_every == 0 {
                trace.records.push(TraceRecord {
                    time_s: t,
                    reference,
                    measurement,
                    command: hold.get(),
                    applied: position.unwrap_or(hold.get()),
                    active,
                    primary: *primary.state(),
                    secondary: secondary.as_ref().map(|c| *c.state()),
                });
            }
            samples += 1;
        }

        let input = match actuator {
            Some(a) => {
                actuator_state = a.step(&actuator_state, dt, hold.get());
                actuator_state.position
            }
            None => hold.get(),
        };
        output = plant.step(output, dt, input);
        if !output.is_finite() {
            warn!(time_s = t, "plant output diverged");
            return Err(SimError::invalid(
                "plant_dt_s",
                dt,
                "plant integration diverged; reduce the step",
            ));
        }
    }

    info!(
        scenario = %scenario.name,
        samples,
        recorded = trace.records.len(),
        "scenario finished"
    );
    Ok(trace)
}

fn active_at(handover: Option<&HandoverDef>, t: f64) -> ActiveController {
    match handover {
        Some(h) if t >= h.at_s && h.release_at_s.is_none_or(|release| t < release) => {
            ActiveController::Secondary
        }
        _ => ActiveController::Primary,
    }
}

/// Update both controllers for one sample and return the new command.
///
/// The idle controller sees the actuator position, or the fresh command when
/// there is no actuator, as its applied signal.
fn tick(
    primary: &mut AntiWindupController,
    secondary: Option<&mut TrackingController>,
    active: ActiveController,
    idle_policy: IdlePolicy,
    input: &ControllerInput,
    position: Option<f64>,
) -> f64 {
    match (active, secondary) {
        (ActiveController::Secondary, Some(secondary)) => {
            let command = secondary.update_with_feedback(input, FeedbackSignal::Saturated);
            match idle_policy {
                IdlePolicy::Discharge => primary.discharge_integral(input.sampling_interval),
                IdlePolicy::Track => {
                    let applied = position.unwrap_or(command);
                    primary.update_with_feedback(input, FeedbackSignal::Applied(applied));
                }
            }
            command
        }
        (_, secondary) => {
            let command = primary.update(input);
            if let Some(secondary) = secondary {
                let tracking = TrackingControllerInput::new(
                    input.reference_signal,
                    input.actual_signal,
                    position.unwrap_or(command),
                    input.sampling_interval,
                )
                .with_feed_forward(input.feed_forward_signal);
                secondary.update(&tracking);
            }
            command
        }
    }
}
