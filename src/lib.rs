pub mod plant;
pub mod controller;
pub mod simulation;
pub mod analysis;
pub mod export;
pub mod input;
pub mod ipc;
pub mod benchmark;
pub mod async_impl;
pub mod threaded_impl;
pub mod config;
pub mod error;

pub use analysis::StepMetrics;
pub use controller::{Controller, PidController, PidGains, PidState};
pub use error::SimError;
pub use plant::{Plant, PlantState, SecondOrderPlant, FIXED_PLANT};
pub use simulation::{simulate, SimulationConfig, SimulationEngine, SimulationRequest, SimulationResult};
