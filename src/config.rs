//! Config module - Runtime configuration loaded from TOML

use std::path::{Path, PathBuf};

use log::warn;
use serde::Deserialize;

use crate::controller::pid::DEFAULT_FILTER_ALPHA;
use crate::controller::{PidController, PidGains};
use crate::error::Result;
use crate::simulation::{SimulationConfig, SimulationRequest};

pub const DEFAULT_CONFIG_PATH: &str = "config/system_config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub controller: ControllerConfig,
    pub simulation: SimulationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub u_min: f64,
    pub u_max: f64,
    pub anti_windup: bool,
    pub filter_alpha: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            kp: 2.0,
            ki: 1.0,
            kd: 0.5,
            u_min: -100.0,
            u_max: 100.0,
            anti_windup: true,
            filter_alpha: DEFAULT_FILTER_ALPHA,
        }
    }
}

impl ControllerConfig {
    pub fn gains(&self) -> PidGains {
        PidGains::new(self.kp, self.ki, self.kd)
    }

    /// Apply limits, anti-windup and filtering to a controller whose gains
    /// may have come from elsewhere.
    pub fn configure(&self, pid: &mut PidController) -> Result<()> {
        pid.set_limits(self.u_min, self.u_max)?;
        pid.set_anti_windup(self.anti_windup);
        pid.set_filter_alpha(self.filter_alpha)
    }

    pub fn build(&self) -> Result<PidController> {
        let mut pid = PidController::with_gains(self.gains());
        self.configure(&mut pid)?;
        Ok(pid)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub csv_path: Option<PathBuf>,
    pub chart_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn request(&self) -> Result<SimulationRequest> {
        self.simulation.validate()?;
        Ok(SimulationRequest {
            controller: self.controller.build()?,
            config: self.simulation.clone(),
        })
    }
}

pub fn parse_config(text: &str) -> Result<AppConfig> {
    Ok(toml::from_str::<AppConfig>(text)?)
}

/// Missing or malformed files fall back to the defaults.
pub fn load_config(path: &Path) -> AppConfig {
    match std::fs::read_to_string(path) {
        Ok(s) => parse_config(&s).unwrap_or_else(|e| {
            warn!("Ignoring malformed config {}: {}", path.display(), e);
            AppConfig::default()
        }),
        Err(e) => {
            warn!("Config {} not loaded ({}), using defaults", path.display(), e);
            AppConfig::default()
        }
    }
}
