//! Recorded controller samples and their export formats.

use fb_controls::ControllerState;
use serde::{Deserialize, Serialize};

use crate::error::SimResult;

/// Controller driving the plant at a given sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveController {
    Primary,
    Secondary,
}

impl ActiveController {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveController::Primary => "primary",
            ActiveController::Secondary => "secondary",
        }
    }
}

/// One controller sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub time_s: f64,
    pub reference: f64,
    /// `None` while the measurement has dropped out.
    pub measurement: Option<f64>,
    /// Command held until the next sample.
    pub command: f64,
    /// Actuator position, or the command when no actuator is modelled.
    pub applied: f64,
    pub active: ActiveController,
    pub primary: ControllerState,
    pub secondary: Option<ControllerState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub scenario: String,
    pub records: Vec<TraceRecord>,
}

impl Trace {
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            records: Vec::new(),
        }
    }

    pub fn last(&self) -> Option<&TraceRecord> {
        self.records.last()
    }

    /// Records with `from_s <= time_s < to_s`.
    pub fn between(&self, from_s: f64, to_s: f64) -> impl Iterator<Item = &TraceRecord> {
        self.records
            .iter()
            .filter(move |r| r.time_s >= from_s && r.time_s < to_s)
    }

    /// Change of the command at the first record at or after `time_s`.
    pub fn command_step_at(&self, time_s: f64) -> Option<f64> {
        let i = self.records.iter().position(|r| r.time_s >= time_s)?;
        let prev = self.records.get(i.checked_sub(1)?)?;
        Some(self.records[i].command - prev.command)
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::from(
            "time_s,reference,measurement,command,applied,active,\
             primary_control_signal,primary_integral,\
             secondary_control_signal,secondary_integral\n",
        );
        for r in &self.records {
            let measurement = r.measurement.map(|m| m.to_string()).unwrap_or_default();
            let (secondary_signal, secondary_integral) = r
                .secondary
                .map(|s| {
                    (
                        s.control_signal.to_string(),
                        s.control_error_integral.to_string(),
                    )
                })
                .unwrap_or_default();
            out.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{}\n",
                r.time_s,
                r.reference,
                measurement,
                r.command,
                r.applied,
                r.active.as_str(),
                r.primary.control_signal,
                r.primary.control_error_integral,
                secondary_signal,
                secondary_integral,
            ));
        }
        out
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
