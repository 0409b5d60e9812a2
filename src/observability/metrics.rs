use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::core::Verdict;

/// Per-check counters, shared between pool workers
pub struct CheckMetrics {
    check_name: String,
    evaluated: AtomicU64,
    passed: AtomicU64,
    failed: AtomicU64,
    dependency_failures: AtomicU64,
    skipped: AtomicU64,
    total_latency_us: AtomicU64,
    latency_samples: AtomicU64,
}

impl CheckMetrics {
    pub fn new(check_name: impl Into<String>) -> Self {
        Self {
            check_name: check_name.into(),
            evaluated: AtomicU64::new(0),
            passed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            dependency_failures: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            total_latency_us: AtomicU64::new(0),
            latency_samples: AtomicU64::new(0),
        }
    }

    pub fn check_name(&self) -> &str {
        &self.check_name
    }

    pub fn evaluated(&self) -> u64 {
        self.evaluated.load(Ordering::Relaxed)
    }

    pub fn passed(&self) -> u64 {
        self.passed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn dependency_failures(&self) -> u64 {
        self.dependency_failures.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Count one trace verdict
    pub fn record(&self, verdict: &Verdict) {
        self.evaluated.fetch_add(1, Ordering::Relaxed);
        let counter = match verdict {
            Verdict::Pass => &self.passed,
            Verdict::Fail(_) => &self.failed,
            Verdict::DependencyFailed(_) => &self.dependency_failures,
            Verdict::Skipped(_) => &self.skipped,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn start_processing(&self) -> Instant {
        Instant::now()
    }

    /// Record the time spent on one stream
    pub fn finish_processing(&self, start: Instant) {
        let latency_us = start.elapsed().as_micros() as u64;
        self.total_latency_us.fetch_add(latency_us, Ordering::Relaxed);
        self.latency_samples.fetch_add(1, Ordering::Relaxed);
    }

    pub fn avg_latency_us(&self) -> u64 {
        let samples = self.latency_samples.load(Ordering::Relaxed);
        if samples == 0 {
            return 0;
        }
        self.total_latency_us.load(Ordering::Relaxed) / samples
    }
}

impl std::fmt::Debug for CheckMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckMetrics")
            .field("check_name", &self.check_name)
            .field("evaluated", &self.evaluated())
            .field("failed", &self.failed())
            .finish()
    }
}
