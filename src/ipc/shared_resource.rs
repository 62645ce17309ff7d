use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Result, SimError};
use crate::simulation::SimulationResult;

/// Most recent successful result, shared between the run surface and the
/// export surfaces. Results are published whole and never mutated.
#[derive(Clone, Default)]
pub struct ResultStore {
    latest: Arc<RwLock<Option<Arc<SimulationResult>>>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, result: SimulationResult) -> Arc<SimulationResult> {
        let result = Arc::new(result);
        *self.latest.write() = Some(result.clone());
        result
    }

    pub fn latest(&self) -> Result<Arc<SimulationResult>> {
        self.latest.read().clone().ok_or(SimError::NoResult)
    }
}
