//! Input module - Validation of user-supplied gain text

use crate::controller::{PidController, PidGains};
use crate::error::{Result, SimError};

/// Parse a single numeric field. Anything that is not a finite real number is
/// an input error, reported before a simulation is started.
pub fn parse_field(field: &'static str, text: &str) -> Result<f64> {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(SimError::InvalidInput {
            field,
            value: text.to_string(),
        }),
    }
}

pub fn parse_gains(kp: &str, ki: &str, kd: &str) -> Result<PidGains> {
    Ok(PidGains {
        kp: parse_field("kp", kp)?,
        ki: parse_field("ki", ki)?,
        kd: parse_field("kd", kd)?,
    })
}

/// The two ways a user can specify the regulator.
#[derive(Debug, Clone, PartialEq)]
pub enum GainInput {
    Gains(PidGains),
    Specifications { zeta: f64, omega_n: f64 },
}

impl GainInput {
    pub fn parse_specifications(zeta: &str, omega_n: &str) -> Result<Self> {
        Ok(GainInput::Specifications {
            zeta: parse_field("zeta", zeta)?,
            omega_n: parse_field("omega_n", omega_n)?,
        })
    }

    pub fn into_controller(self) -> Result<PidController> {
        match self {
            GainInput::Gains(gains) => Ok(PidController::with_gains(gains)),
            GainInput::Specifications { zeta, omega_n } => {
                PidController::from_specifications(zeta, omega_n)
            }
        }
    }
}
