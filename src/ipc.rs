//! IPC module - Result hand-off between simulation workers and their callers

pub mod channels;
pub mod shared_resource;

pub use channels::{outcome_channel, Outcome, OutcomeReceiver, OutcomeSender};
pub use shared_resource::ResultStore;
