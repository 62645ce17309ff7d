use std::fmt;

use crate::error::{Result, SimError};

pub const SETPOINT: f64 = 1.0;
pub const RISE_FRACTION: f64 = 0.9;
pub const SETTLING_BAND: f64 = 0.02;
pub const PEAK_TOLERANCE: f64 = 0.001;

/// Samples in the final tenth of the record, used for the steady-state mean.
fn tail_window(n: usize) -> usize {
    n / 10
}

// ============================================================================
// STEP METRICS - Performance indices of a closed-loop step response
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepMetrics {
    pub rise_time: f64,
    pub peak_time: f64,
    pub overshoot_percent: f64,
    pub settling_time: f64,
    pub steady_state_error: f64,
}

impl StepMetrics {
    /// Analyze `output` sampled at `time` against a unit set-point.
    ///
    /// Fails when the series are empty, of different lengths, too short for
    /// a non-empty steady-state window, or contain non-finite samples.
    pub fn analyze(time: &[f64], output: &[f64]) -> Result<Self> {
        if time.len() != output.len() {
            return Err(SimError::LengthMismatch {
                left: "time",
                left_len: time.len(),
                right: "output",
                right_len: output.len(),
            });
        }
        let required = 10;
        if tail_window(output.len()) == 0 {
            return Err(SimError::InsufficientSamples {
                required,
                actual: output.len(),
            });
        }
        if output.iter().chain(time).any(|v| !v.is_finite()) {
            return Err(SimError::NonFinite { quantity: "response sample" });
        }

        Ok(Self {
            rise_time: rise_time(time, output),
            peak_time: peak_time(time, output),
            overshoot_percent: overshoot_percent(output),
            settling_time: settling_time(time, output),
            steady_state_error: steady_state_error(output),
        })
    }

    pub fn report(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StepMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rise Time: {:.3} s", self.rise_time)?;
        writeln!(f, "Peak Time: {:.3} s", self.peak_time)?;
        writeln!(f, "Overshoot: {:.2} %", self.overshoot_percent)?;
        writeln!(f, "Settling Time: {:.3} s", self.settling_time)?;
        write!(f, "Steady-State Error: {:.4}", self.steady_state_error)
    }
}

// Callers below rely on `analyze` having checked lengths and emptiness.

/// First crossing of 90% of the set-point; the last sample if never reached.
fn rise_time(time: &[f64], output: &[f64]) -> f64 {
    output
        .iter()
        .position(|&y| y >= RISE_FRACTION * SETPOINT)
        .map_or(time[time.len() - 1], |i| time[i])
}

/// Latest sample outside the 2% band, scanning from the end. Returns the
/// first sample when the response never leaves the band.
fn settling_time(time: &[f64], output: &[f64]) -> f64 {
    let tolerance = SETTLING_BAND * SETPOINT;
    output
        .iter()
        .rposition(|&y| (y - SETPOINT).abs() > tolerance)
        .map_or(time[0], |i| time[i])
}

fn max_output(output: &[f64]) -> f64 {
    output.iter().copied().fold(output[0], f64::max)
}

fn overshoot_percent(output: &[f64]) -> f64 {
    ((max_output(output) - SETPOINT) / SETPOINT * 100.0).max(0.0)
}

fn peak_time(time: &[f64], output: &[f64]) -> f64 {
    let max = max_output(output);
    output
        .iter()
        .position(|&y| (y - max).abs() < PEAK_TOLERANCE)
        .map_or(0.0, |i| time[i])
}

fn steady_state_error(output: &[f64]) -> f64 {
    let window = tail_window(output.len());
    let tail = &output[output.len() - window..];
    let mean = tail.iter().sum::<f64>() / window as f64;
    (SETPOINT - mean).abs()
}
