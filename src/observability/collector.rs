use std::sync::Arc;

use serde::Serialize;

use super::CheckMetrics;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub check_name: String,
    pub evaluated: u64,
    pub passed: u64,
    pub failed: u64,
    pub dependency_failures: u64,
    pub skipped: u64,
    pub avg_latency_us: u64,
}

/// Metrics of every configured check, in pipeline order
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    metrics: Vec<Arc<CheckMetrics>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, metrics: Arc<CheckMetrics>) {
        self.metrics.push(metrics);
    }

    pub fn snapshot(&self) -> Vec<MetricsSnapshot> {
        self.metrics
            .iter()
            .map(|metrics| MetricsSnapshot {
                check_name: metrics.check_name().to_string(),
                evaluated: metrics.evaluated(),
                passed: metrics.passed(),
                failed: metrics.failed(),
                dependency_failures: metrics.dependency_failures(),
                skipped: metrics.skipped(),
                avg_latency_us: metrics.avg_latency_us(),
            })
            .collect()
    }

    pub fn get_check_metrics(&self, check_name: &str) -> Option<Arc<CheckMetrics>> {
        self.metrics
            .iter()
            .find(|m| m.check_name() == check_name)
            .cloned()
    }
}
