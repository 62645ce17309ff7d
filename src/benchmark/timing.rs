use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hdrhistogram::Histogram;
use parking_lot::Mutex;

use crate::error::{Result, SimError};

// ============================================================================
// RUN TIMINGS - Thread-safe wall-clock tracking of simulation runs
// ============================================================================

#[derive(Clone)]
pub struct RunTimings {
    run_hist: Arc<Mutex<Histogram<u64>>>,
    failures: Arc<AtomicU64>,
}

impl RunTimings {
    pub fn new() -> Result<Self> {
        let hist = Histogram::new(3).map_err(|e| SimError::Timing(format!("{e:?}")))?;
        Ok(Self {
            run_hist: Arc::new(Mutex::new(hist)),
            failures: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Failed runs are counted but kept out of the latency distribution.
    pub fn record(&self, duration: Duration, succeeded: bool) {
        if succeeded {
            self.run_hist.lock().saturating_record(duration.as_nanos() as u64);
        } else {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn report(&self) -> TimingReport {
        let hist = self.run_hist.lock();
        TimingReport {
            runs: hist.len(),
            failures: self.failures.load(Ordering::Relaxed),
            p50: Duration::from_nanos(hist.value_at_quantile(0.5)),
            p99: Duration::from_nanos(hist.value_at_quantile(0.99)),
            max: Duration::from_nanos(hist.max()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingReport {
    pub runs: u64,
    pub failures: u64,
    pub p50: Duration,
    pub p99: Duration,
    pub max: Duration,
}
