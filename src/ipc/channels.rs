use crossbeam::channel::{bounded, Receiver, Sender, TryRecvError};

use crate::error::SimError;
use crate::simulation::SimulationResult;

/// Terminal outcome of one simulation: the whole result or the failure.
pub type Outcome = Result<SimulationResult, SimError>;

// ============================================================================
// ONE-SHOT CHANNEL - Exactly one outcome per submission
// ============================================================================

pub struct OutcomeSender {
    tx: Sender<Outcome>,
}

pub struct OutcomeReceiver {
    rx: Receiver<Outcome>,
}

pub fn outcome_channel() -> (OutcomeSender, OutcomeReceiver) {
    let (tx, rx) = bounded(1);
    (OutcomeSender { tx }, OutcomeReceiver { rx })
}

impl OutcomeSender {
    /// Consumes the sender; returns false when the receiver is already gone.
    pub fn send(self, outcome: Outcome) -> bool {
        self.tx.send(outcome).is_ok()
    }
}

impl OutcomeReceiver {
    /// Blocks until the worker reports. A worker that exits without
    /// reporting yields `WorkerDisconnected`.
    pub fn recv(self) -> Outcome {
        self.rx.recv().unwrap_or(Err(SimError::WorkerDisconnected))
    }

    /// `None` while the worker is still running.
    pub fn try_recv(&self) -> Option<Outcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(SimError::WorkerDisconnected)),
        }
    }
}
