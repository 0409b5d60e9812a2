use super::MetricsCollector;

pub struct PipelineMonitor {
    collector: MetricsCollector,
}

impl PipelineMonitor {
    pub fn new(collector: MetricsCollector) -> Self {
        Self { collector }
    }

    pub fn generate_report(&self) -> String {
        let snapshot = self.collector.snapshot();

        if snapshot.is_empty() {
            return "No checks registered".to_string();
        }

        let mut report = String::from("=== QC Check Metrics ===\n");

        for metrics in &snapshot {
            report.push_str(&format!(
                "\n[{}]\n  Traces: {} evaluated\n  Outcomes: {} passed, {} failed, {} dependency failures, {} skipped\n  Avg Latency: {}μs\n",
                metrics.check_name,
                metrics.evaluated,
                metrics.passed,
                metrics.failed,
                metrics.dependency_failures,
                metrics.skipped,
                metrics.avg_latency_us
            ));
        }

        report
    }

    pub fn collector(&self) -> &MetricsCollector {
        &self.collector
    }
}
