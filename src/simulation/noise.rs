use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::error::{Result, SimError};

/// Uniform measurement noise on the closed-loop feedback path.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MeasurementNoise {
    pub amplitude: f64,
    #[serde(default)]
    pub seed: u64,
}

impl MeasurementNoise {
    pub fn new(amplitude: f64, seed: u64) -> Self {
        Self { amplitude, seed }
    }

    /// The sampling range `[-amplitude, amplitude)` must itself have a finite
    /// width, so amplitudes above `f64::MAX / 2` are rejected too.
    pub fn validate(&self) -> Result<()> {
        let width = 2.0 * self.amplitude;
        if !width.is_finite() || self.amplitude <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "noise amplitude must be finite and positive, got {}",
                self.amplitude
            )));
        }
        Ok(())
    }

    pub fn source(&self) -> Result<NoiseSource> {
        self.validate()?;
        Ok(NoiseSource {
            rng: StdRng::seed_from_u64(self.seed),
            amplitude: self.amplitude,
        })
    }
}

pub struct NoiseSource {
    rng: StdRng,
    amplitude: f64,
}

impl NoiseSource {
    pub fn sample(&mut self) -> f64 {
        self.rng.gen_range(-self.amplitude..self.amplitude)
    }
}
