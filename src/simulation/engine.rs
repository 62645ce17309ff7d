use log::{debug, warn};

use super::noise::NoiseSource;
use super::{SimulationConfig, SimulationResult};
use crate::controller::Controller;
use crate::error::{Result, SimError};
use crate::plant::Plant;

/// Fixed-step integrator running one open-loop and one closed-loop branch of
/// the same plant in lockstep.
#[derive(Debug, Clone)]
pub struct SimulationEngine<P, C> {
    plant: P,
    controller: C,
    config: SimulationConfig,
}

impl<P: Plant, C: Controller> SimulationEngine<P, C> {
    pub fn new(plant: P, controller: C, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            plant,
            controller,
            config,
        })
    }

    /// Every call starts from rest with fresh controller state, so repeated
    /// runs are bit-identical.
    pub fn run(&self) -> Result<SimulationResult> {
        debug!(
            "Simulation start: dt={}, steps={}, reference={}",
            self.config.dt, self.config.steps, self.config.reference
        );
        match self.integrate() {
            Ok(result) => {
                debug!("Simulation complete: {} samples", result.len());
                Ok(result)
            }
            Err(e) => {
                warn!("Simulation aborted: {}", e);
                Err(e)
            }
        }
    }

    fn integrate(&self) -> Result<SimulationResult> {
        let SimulationConfig {
            dt,
            steps,
            reference,
            noise,
        } = self.config;
        let mut noise: Option<NoiseSource> = noise.map(|n| n.source()).transpose()?;

        let mut open = P::State::default();
        let mut closed = P::State::default();
        let mut ctrl = C::State::default();
        let mut result = SimulationResult::with_capacity(steps);

        for k in 0..steps {
            let t = k as f64 * dt;

            // Open loop: the raw step drives the plant, sampled before the advance.
            let y_open = self.plant.output(&open);
            open = self.plant.step(open, reference, dt);

            // Closed loop: error from the previous output, sampled after the advance.
            let disturbance = noise.as_mut().map_or(0.0, NoiseSource::sample);
            let measured = self.plant.output(&closed) + disturbance;
            let (u, next) = self
                .controller
                .update(ctrl, reference - measured, dt)
                .map_err(|e| e.at_step(k))?;
            ctrl = next;
            closed = self.plant.step(closed, u, dt);
            let y_closed = self.plant.output(&closed);

            if !y_open.is_finite() {
                return Err(SimError::ComputationFault { step: k, quantity: "open-loop output" });
            }
            if !y_closed.is_finite() {
                return Err(SimError::ComputationFault { step: k, quantity: "closed-loop output" });
            }

            result.push(t, y_open, y_closed, u);
        }

        Ok(result)
    }
}
