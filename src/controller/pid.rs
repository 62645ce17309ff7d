use serde::Deserialize;

use super::Controller;
use crate::error::{Result, SimError};

/// Guards the derivative quotient against a vanishing step.
const DT_EPSILON: f64 = 1e-9;

pub const MIN_FILTER_ALPHA: f64 = 0.01;
pub const MAX_FILTER_ALPHA: f64 = 0.5;
pub const DEFAULT_FILTER_ALPHA: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }
}

/// Mutable memory of one PID loop. Owned by a single run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PidState {
    pub integral: f64,
    pub prev_error: f64,
    pub prev_filtered_derivative: f64,
}

impl PidState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// PID regulator with output saturation, integral clamping and a
/// first-order low-pass filter on the derivative term.
#[derive(Debug, Clone, PartialEq)]
pub struct PidController {
    // Gains
    gains: PidGains,

    // Actuator range
    u_min: f64,
    u_max: f64,

    // Anti-windup
    anti_windup: bool,

    // Derivative smoothing factor, always within [MIN_FILTER_ALPHA, MAX_FILTER_ALPHA]
    filter_alpha: f64,
}

impl PidController {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self::with_gains(PidGains::new(kp, ki, kd))
    }

    pub fn with_gains(gains: PidGains) -> Self {
        Self {
            gains,
            u_min: -100.0,
            u_max: 100.0,
            anti_windup: true,
            filter_alpha: DEFAULT_FILTER_ALPHA,
        }
    }

    /// Pole-placement tuning for the fixed plant 4 / (s^2 + 2s) only:
    ///
    /// * `kp = 2 * zeta * omega_n`
    /// * `ki = omega_n^2`
    /// * `kd = (2 * zeta * omega_n - 2) / 2`
    ///
    /// The formula bakes in the plant's damping of 2 and is meaningless for
    /// any other plant.
    pub fn from_specifications(zeta: f64, omega_n: f64) -> Result<Self> {
        if !zeta.is_finite() || !omega_n.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "damping ratio {zeta} and natural frequency {omega_n} must be finite"
            )));
        }
        let two_zeta_omega = 2.0 * zeta * omega_n;
        Ok(Self::new(
            two_zeta_omega,
            omega_n * omega_n,
            (two_zeta_omega - 2.0) / 2.0,
        ))
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    pub fn limits(&self) -> (f64, f64) {
        (self.u_min, self.u_max)
    }

    pub fn anti_windup(&self) -> bool {
        self.anti_windup
    }

    pub fn filter_alpha(&self) -> f64 {
        self.filter_alpha
    }

    pub fn set_limits(&mut self, min: f64, max: f64) -> Result<()> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(SimError::InvalidConfig(format!(
                "output limits [{min}, {max}] are not a finite interval"
            )));
        }
        self.u_min = min;
        self.u_max = max;
        Ok(())
    }

    pub fn set_anti_windup(&mut self, enabled: bool) {
        self.anti_windup = enabled;
    }

    /// Values outside [0.01, 0.5] are clamped into range.
    pub fn set_filter_alpha(&mut self, alpha: f64) -> Result<()> {
        if alpha.is_nan() {
            return Err(SimError::InvalidConfig("filter alpha is NaN".into()));
        }
        self.filter_alpha = alpha.clamp(MIN_FILTER_ALPHA, MAX_FILTER_ALPHA);
        Ok(())
    }

    /// Range the integral accumulator is held to so that `ki * integral`
    /// stays within the actuator limits. `None` when no clamp applies.
    pub fn integral_bounds(&self) -> Option<(f64, f64)> {
        let ki = self.gains.ki;
        // A NaN gain is reported as a fault further down the update.
        if !self.anti_windup || ki == 0.0 || ki.is_nan() {
            return None;
        }
        let (a, b) = (self.u_min / ki, self.u_max / ki);
        Some((a.min(b), a.max(b)))
    }
}

fn finite(value: f64, quantity: &'static str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::NonFinite { quantity })
    }
}

impl Controller for PidController {
    type State = PidState;

    fn update(&self, state: PidState, error: f64, dt: f64) -> Result<(f64, PidState)> {
        let error = finite(error, "error")?;
        let dt = finite(dt, "dt")?;
        let PidGains { kp, ki, kd } = self.gains;

        // Proportional term
        let p = kp * error;

        // Integral term with anti-windup
        let mut integral = state.integral + error * dt;
        if let Some((lo, hi)) = self.integral_bounds() {
            integral = integral.clamp(lo, hi);
        }
        let integral = finite(integral, "integral")?;
        let i = ki * integral;

        // Derivative term, low-pass filtered
        let raw_derivative = (error - state.prev_error) / (dt + DT_EPSILON);
        let filtered = self.filter_alpha * raw_derivative
            + (1.0 - self.filter_alpha) * state.prev_filtered_derivative;
        let filtered = finite(filtered, "derivative")?;
        let d = kd * filtered;

        let u = finite(p + i + d, "control signal")?.clamp(self.u_min, self.u_max);

        let next = PidState {
            integral,
            prev_error: error,
            prev_filtered_derivative: filtered,
        };
        Ok((u, next))
    }
}
