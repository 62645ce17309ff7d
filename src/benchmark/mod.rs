pub mod timing;

pub use timing::{RunTimings, TimingReport};
