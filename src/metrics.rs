use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Operational counters for monitoring
#[derive(Clone)]
pub struct Metrics {
    pub failures_handled: Arc<AtomicUsize>,
    pub record_write_failures: Arc<AtomicUsize>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            failures_handled: Arc::new(AtomicUsize::new(0)),
            record_write_failures: Arc::new(AtomicUsize::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_failures_handled(&self) {
        self.failures_handled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_record_write_failures(&self) {
        self.record_write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            failures_handled: self.failures_handled.load(Ordering::Relaxed),
            record_write_failures: self.record_write_failures.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub failures_handled: usize,
    pub record_write_failures: usize,
    pub uptime_seconds: u64,
}
