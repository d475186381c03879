//! Scenario file format and validation.
//!
//! A scenario describes one closed-loop run: a first-order plant, an optional
//! actuator, a reference schedule, the controller(s) and when measurements
//! drop out. Scenarios are stored as YAML.

use std::path::Path;

use fb_controls::ControllerConfig;
use serde::{Deserialize, Serialize};

use crate::actuator::FirstOrderActuator;
use crate::error::{SimError, SimResult};
use crate::is_positive;
use crate::plant::FirstOrderPlant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub duration_s: f64,
    /// Plant integration step.
    pub plant_dt_s: f64,
    /// Controller sample period; a whole multiple of `plant_dt_s` in practice.
    pub controller_period_s: f64,
    pub plant: PlantDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actuator: Option<ActuatorDef>,
    /// Piecewise-constant reference, sorted by `at_s`.
    pub reference: Vec<ReferenceStepDef>,
    #[serde(default)]
    pub feed_forward: f64,
    pub primary: ControllerConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handover: Option<HandoverDef>,
    /// Windows in which the measurement reads NaN.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropouts: Vec<DropoutDef>,
    /// Record every N-th controller sample.
    #[serde(default = "default_record_every")]
    pub record_every: usize,
}

fn default_record_every() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantDef {
    pub gain: f64,
    pub time_constant_s: f64,
    #[serde(default)]
    pub initial_output: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorDef {
    pub time_constant_s: f64,
    pub rate_limit: f64,
    pub min_position: f64,
    pub max_position: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceStepDef {
    pub at_s: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropoutDef {
    pub from_s: f64,
    pub to_s: f64,
}

/// What the primary controller does while the secondary drives the plant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdlePolicy {
    /// Bleed the integral off with the discharge time constant.
    #[default]
    Discharge,
    /// Keep updating against the applied signal.
    Track,
}

/// Transfer of the plant from the primary to a secondary controller.
///
/// Before `at_s` the secondary runs in tracking mode against the applied
/// signal. After `release_at_s` the primary takes over again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoverDef {
    pub secondary: ControllerConfig,
    pub at_s: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_at_s: Option<f64>,
    #[serde(default)]
    pub primary_idle: IdlePolicy,
}

impl Scenario {
    /// Reference value in effect at `time_s`; zero before the first step.
    pub fn reference_at(&self, time_s: f64) -> f64 {
        self.reference
            .iter()
            .take_while(|step| step.at_s <= time_s)
            .last()
            .map_or(0.0, |step| step.value)
    }

    /// Whether the measurement is unavailable at `time_s`.
    pub fn in_dropout(&self, time_s: f64) -> bool {
        self.dropouts
            .iter()
            .any(|d| time_s >= d.from_s && time_s < d.to_s)
    }

    pub fn plant_model(&self) -> SimResult<FirstOrderPlant> {
        FirstOrderPlant::new(self.plant.gain, self.plant.time_constant_s)
    }

    pub fn actuator_model(&self) -> SimResult<Option<FirstOrderActuator>> {
        self.actuator
            .as_ref()
            .map(|a| {
                FirstOrderActuator::new(
                    a.time_constant_s,
                    a.rate_limit,
                    a.min_position,
                    a.max_position,
                )
            })
            .transpose()
    }

    pub fn from_yaml_str(content: &str) -> SimResult<Self> {
        let scenario: Scenario = serde_yaml::from_str(content)?;
        validate_scenario(&scenario)?;
        Ok(scenario)
    }
}

pub fn load_yaml(path: &Path) -> SimResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    Scenario::from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, scenario: &Scenario) -> SimResult<()> {
    validate_scenario(scenario)?;
    let content = serde_yaml::to_string(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Check a scenario before running it.
pub fn validate_scenario(scenario: &Scenario) -> SimResult<()> {
    if scenario.name.trim().is_empty() {
        return Err(SimError::invalid("name", "\"\"", "must not be empty"));
    }
    require_positive("duration_s", scenario.duration_s)?;
    require_positive("plant_dt_s", scenario.plant_dt_s)?;
    require_positive("controller_period_s", scenario.controller_period_s)?;
    if scenario.controller_period_s < scenario.plant_dt_s {
        return Err(SimError::invalid(
            "controller_period_s",
            scenario.controller_period_s,
            "must not be shorter than plant_dt_s",
        ));
    }
    if scenario.record_every == 0 {
        return Err(SimError::invalid("record_every", 0, "must be at least 1"));
    }
    if !scenario.plant.initial_output.is_finite() {
        return Err(SimError::invalid(
            "plant.initial_output",
            scenario.plant.initial_output,
            "must be finite",
        ));
    }
    scenario.plant_model()?;
    scenario.actuator_model()?;

    if scenario.reference.is_empty() {
        return Err(SimError::invalid("reference", "[]", "needs at least one step"));
    }
    for pair in scenario.reference.windows(2) {
        if pair[1].at_s < pair[0].at_s {
            return Err(SimError::invalid(
                "reference.at_s",
                pair[1].at_s,
                "steps must be sorted by time",
            ));
        }
    }
    for step in &scenario.reference {
        if !step.at_s.is_finite() || !step.value.is_finite() {
            return Err(SimError::invalid(
                "reference",
                format!("({}, {})", step.at_s, step.value),
                "time and value must be finite",
            ));
        }
    }
    if !scenario.feed_forward.is_finite() {
        return Err(SimError::invalid(
            "feed_forward",
            scenario.feed_forward,
            "must be finite",
        ));
    }

    scenario
        .primary
        .validate()
        .map_err(|source| SimError::Controller {
            which: "primary",
            source,
        })?;

    if let Some(handover) = &scenario.handover {
        handover
            .secondary
            .validate()
            .map_err(|source| SimError::Controller {
                which: "secondary",
                source,
            })?;
        if !(0.0..=scenario.duration_s).contains(&handover.at_s) {
            return Err(SimError::invalid(
                "handover.at_s",
                handover.at_s,
                "must lie within the run",
            ));
        }
        if let Some(release) = handover.release_at_s
            && (!release.is_finite() || release <= handover.at_s)
        {
            return Err(SimError::invalid(
                "handover.release_at_s",
                release,
                "must come after handover.at_s",
            ));
        }
    }

    for dropout in &scenario.dropouts {
        if !dropout.from_s.is_finite()
            || !dropout.to_s.is_finite()
            || dropout.to_s <= dropout.from_s
        {
            return Err(SimError::invalid(
                "dropouts",
                format!("[{}, {})", dropout.from_s, dropout.to_s),
                "window must be finite and non-empty",
            ));
        }
    }

    Ok(())
}

fn require_positive(field: &str, value: f64) -> SimResult<()> {
    if is_positive(value) {
        Ok(())
    } else {
        Err(SimError::invalid(field, value, "must be positive"))
    }
}
