use log::debug;

use crate::error::SimError;
use crate::ipc::channels::Outcome;
use crate::simulation::SimulationRequest;

/// Resolve a run on tokio's blocking pool so async hosts never stall their
/// executor. The future yields one terminal outcome.
pub async fn simulate_async(request: SimulationRequest) -> Outcome {
    debug!("Async run submitted with gains {:?}", request.controller.gains());
    tokio::task::spawn_blocking(move || request.run())
        .await
        .unwrap_or(Err(SimError::WorkerDisconnected))
}
