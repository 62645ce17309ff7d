//! Error module - Failure taxonomy for input, computation and export

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Gain text that does not parse as a finite real number.
    #[error("invalid input for {field}: {value:?} is not a finite number")]
    InvalidInput { field: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raised by a controller; the engine re-labels it with the step index.
    #[error("non-finite {quantity}")]
    NonFinite { quantity: &'static str },

    #[error("computation fault at step {step}: non-finite {quantity}")]
    ComputationFault { step: usize, quantity: &'static str },

    #[error("insufficient samples: need at least {required}, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },

    #[error("length mismatch: {left} has {left_len} samples, {right} has {right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    #[error("malformed CSV at line {line}: {message}")]
    CsvFormat { line: u64, message: String },

    #[error("no simulation result available")]
    NoResult,

    #[error("simulation worker terminated without a result")]
    WorkerDisconnected,

    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error("timing histogram error: {0}")]
    Timing(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl SimError {
    /// Attach the step index to a controller-level fault.
    pub fn at_step(self, step: usize) -> Self {
        match self {
            SimError::NonFinite { quantity } => SimError::ComputationFault { step, quantity },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
