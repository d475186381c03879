//! Closed-loop scenarios for the feedback controllers.
//!
//! Provides:
//! - YAML scenario schema with load/save and validation
//! - First-order plant and rate-limited actuator models
//! - Sampled controller execution with zero-order hold
//! - Hand-over between a primary and a tracking secondary controller
//! - Recorded traces, exportable as CSV or JSON

pub mod actuator;
pub mod error;
pub mod plant;
pub mod runner;
pub mod sampled;
pub mod scenario;
pub mod trace;

pub use actuator::{ActuatorState, FirstOrderActuator};
pub use error::{SimError, SimResult};
pub use plant::FirstOrderPlant;
pub use runner::run_scenario;
pub use sampled::{SampleClock, SampleConfig, ZeroOrderHold};
pub use scenario::{
    ActuatorDef, DropoutDef, HandoverDef, IdlePolicy, PlantDef, ReferenceStepDef, Scenario,
    load_yaml, save_yaml, validate_scenario,
};
pub use trace::{ActiveController, Trace, TraceRecord};

/// `true` for finite, strictly positive values.
pub(crate) fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
