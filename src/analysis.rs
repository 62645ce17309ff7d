//! Analysis module - Step-response performance indices and charts

pub mod chart;
pub mod metrics;

pub use chart::render_step_response;
pub use metrics::StepMetrics;
