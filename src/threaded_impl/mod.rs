pub mod simulation_thread;

pub use simulation_thread::{run_parallel, spawn_simulation, spawn_timed_simulation, SimulationHandle};
