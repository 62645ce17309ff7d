use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Instant;

use log::{debug, warn};

use crate::benchmark::RunTimings;
use crate::error::Result;
use crate::ipc::channels::{outcome_channel, Outcome, OutcomeReceiver};
use crate::simulation::SimulationRequest;

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// Caller's side of a submitted run.
pub struct SimulationHandle {
    run_id: u64,
    receiver: OutcomeReceiver,
    thread: thread::JoinHandle<()>,
}

impl SimulationHandle {
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Poll without blocking; `None` while the run is in progress.
    pub fn try_result(&self) -> Option<Outcome> {
        self.receiver.try_recv()
    }

    pub fn wait(self) -> Outcome {
        let outcome = self.receiver.recv();
        if self.thread.join().is_err() {
            warn!("Simulation run #{} panicked", self.run_id);
        }
        outcome
    }
}

/// Run `request` off the calling thread. The controller and plant state are
/// created inside the worker, so concurrent runs share nothing.
pub fn spawn_simulation(request: SimulationRequest) -> Result<SimulationHandle> {
    spawn_worker(request, None)
}

pub fn spawn_timed_simulation(
    request: SimulationRequest,
    timings: RunTimings,
) -> Result<SimulationHandle> {
    spawn_worker(request, Some(timings))
}

fn spawn_worker(request: SimulationRequest, timings: Option<RunTimings>) -> Result<SimulationHandle> {
    let run_id = NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed);
    let (tx, receiver) = outcome_channel();

    let thread = thread::Builder::new()
        .name(format!("simulation-{run_id}"))
        .spawn(move || {
            debug!("Run #{} started with gains {:?}", run_id, request.controller.gains());
            let start = Instant::now();
            let outcome = request.run();
            let elapsed = start.elapsed();

            if let Some(timings) = &timings {
                timings.record(elapsed, outcome.is_ok());
            }
            match &outcome {
                Ok(result) => debug!("Run #{} finished: {} samples in {:?}", run_id, result.len(), elapsed),
                Err(e) => warn!("Run #{} failed: {}", run_id, e),
            }

            if !tx.send(outcome) {
                debug!("Run #{} outcome dropped: caller went away", run_id);
            }
        })?;

    Ok(SimulationHandle {
        run_id,
        receiver,
        thread,
    })
}

/// Run every request on its own thread; outcomes come back in submission order.
pub fn run_parallel(requests: Vec<SimulationRequest>, timings: &RunTimings) -> Result<Vec<Outcome>> {
    let handles = requests
        .into_iter()
        .map(|request| spawn_timed_simulation(request, timings.clone()))
        .collect::<Result<Vec<_>>>()?;
    Ok(handles.into_iter().map(SimulationHandle::wait).collect())
}
