//! Sampled execution of the controllers.
//!
//! The plant is integrated with a small fixed step while the controllers run
//! at their own, slower period. Between samples the command is held constant
//! (zero-order hold).

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::is_positive;

/// Relative slack when comparing a time against the next sample instant, so
/// that `k * plant_dt` lands on the sample grid despite rounding.
const SAMPLE_SLACK: f64 = 1e-9;

/// Sample period of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Sample period in seconds.
    pub dt: f64,
}

impl SampleConfig {
    pub fn new(dt: f64) -> SimResult<Self> {
        if !is_positive(dt) {
            return Err(SimError::InvalidArg {
                what: "sample period must be positive",
            });
        }
        Ok(Self { dt })
    }
}

/// Tracks when a controller is due and how long ago it last ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleClock {
    pub config: SampleConfig,
    pub next_sample_time: f64,
    pub last_sample_time: f64,
}

impl SampleClock {
    pub fn new(config: SampleConfig, initial_time: f64) -> Self {
        Self {
            config,
            next_sample_time: initial_time + config.dt,
            last_sample_time: initial_time,
        }
    }

    pub fn should_sample(&self, current_time: f64) -> bool {
        current_time >= self.next_sample_time - SAMPLE_SLACK * self.config.dt
    }

    /// Mark a sample taken at `current_time` and return the time elapsed
    /// since the previous one.
    pub fn advance(&mut self, current_time: f64) -> f64 {
        let elapsed = current_time - self.last_sample_time;
        self.last_sample_time = current_time;
        self.next_sample_time += self.config.dt;
        elapsed
    }
}

/// Holds the last controller output between samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroOrderHold {
    pub value: f64,
    pub clock: SampleClock,
}

impl ZeroOrderHold {
    pub fn new(config: SampleConfig, initial_time: f64, initial_value: f64) -> Self {
        Self {
            value: initial_value,
            clock: SampleClock::new(config, initial_time),
        }
    }

    pub fn get(&self) -> f64 {
        self.value
    }

    /// If a sample is due, replace the held value with `compute(elapsed)`.
    ///
    /// Returns `true` if the value was updated.
    pub fn update_with<F>(&mut self, current_time: f64, compute: F) -> bool
    where
        F: FnOnce(f64) -> f64,
    {
        if !self.clock.should_sample(current_time) {
            return false;
        }
        let elapsed = self.clock.advance(current_time);
        self.value = compute(elapsed);
        true
    }
}
