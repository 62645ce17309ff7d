pub mod simulation_task;

pub use simulation_task::simulate_async;
