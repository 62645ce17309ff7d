//! Controller module - Discrete feedback controllers with caller-owned state

pub mod pid;

pub use pid::{PidController, PidGains, PidState};

use crate::error::Result;

/// A controller holds only configuration; its mutable memory lives in
/// `State`, which the caller threads through successive updates.
pub trait Controller {
    type State: Copy + Default;

    /// Returns the control signal and the state to pass to the next update.
    fn update(&self, state: Self::State, error: f64, dt: f64) -> Result<(f64, Self::State)>;
}
