//! Simulation module - Side-by-side open-loop / closed-loop step response

pub mod engine;
pub mod noise;

pub use engine::SimulationEngine;
pub use noise::MeasurementNoise;

use serde::Deserialize;

use crate::controller::{PidController, PidGains};
use crate::error::{Result, SimError};
use crate::plant::FIXED_PLANT;

// ============================================================================
// SIMULATION CONFIG - Fixed horizon, fixed step
// ============================================================================

/// Upper bound on the horizon; the result columns are reserved up front.
pub const MAX_STEPS: usize = 10_000_000;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub dt: f64,
    pub steps: usize,
    pub reference: f64,
    pub noise: Option<MeasurementNoise>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            steps: 2000,
            reference: 1.0,
            noise: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "time step must be finite and positive, got {}",
                self.dt
            )));
        }
        if self.steps == 0 || self.steps > MAX_STEPS {
            return Err(SimError::InvalidConfig(format!(
                "step count must be within 1..={MAX_STEPS}, got {}",
                self.steps
            )));
        }
        if !self.reference.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "reference must be finite, got {}",
                self.reference
            )));
        }
        if let Some(noise) = &self.noise {
            noise.validate()?;
        }
        Ok(())
    }

    pub fn horizon(&self) -> f64 {
        self.steps as f64 * self.dt
    }
}

// ============================================================================
// SIMULATION RESULT - Four equal-length sequences, immutable once built
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimulationResult {
    time: Vec<f64>,
    output_before: Vec<f64>,
    output_after: Vec<f64>,
    control_signal: Vec<f64>,
}

impl SimulationResult {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            time: Vec::with_capacity(n),
            output_before: Vec::with_capacity(n),
            output_after: Vec::with_capacity(n),
            control_signal: Vec::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, t: f64, before: f64, after: f64, control: f64) {
        self.time.push(t);
        self.output_before.push(before);
        self.output_after.push(after);
        self.control_signal.push(control);
    }

    /// Rebuild a result from its columns, e.g. after reading an export.
    pub fn from_columns(
        time: Vec<f64>,
        output_before: Vec<f64>,
        output_after: Vec<f64>,
        control_signal: Vec<f64>,
    ) -> Result<Self> {
        let n = time.len();
        for (name, len) in [
            ("output_before", output_before.len()),
            ("output_after", output_after.len()),
            ("control_signal", control_signal.len()),
        ] {
            if len != n {
                return Err(SimError::LengthMismatch {
                    left: "time",
                    left_len: n,
                    right: name,
                    right_len: len,
                });
            }
        }
        Ok(Self {
            time,
            output_before,
            output_after,
            control_signal,
        })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Open-loop output.
    pub fn output_before(&self) -> &[f64] {
        &self.output_before
    }

    /// Closed-loop output.
    pub fn output_after(&self) -> &[f64] {
        &self.output_after
    }

    pub fn control_signal(&self) -> &[f64] {
        &self.control_signal
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

// ============================================================================
// SIMULATION REQUEST - What a worker is handed
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub controller: PidController,
    pub config: SimulationConfig,
}

impl SimulationRequest {
    pub fn new(controller: PidController) -> Self {
        Self {
            controller,
            config: SimulationConfig::default(),
        }
    }

    /// Runs against the fixed plant with fresh controller and plant state.
    pub fn run(&self) -> Result<SimulationResult> {
        SimulationEngine::new(FIXED_PLANT, self.controller.clone(), self.config.clone())?.run()
    }
}

/// Default-horizon run of the fixed plant under the given gains.
pub fn simulate(gains: PidGains) -> Result<SimulationResult> {
    SimulationRequest::new(PidController::with_gains(gains)).run()
}
