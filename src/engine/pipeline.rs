use std::sync::Arc;

use log::{info, warn};
use serde_json::Value;

use crate::checks::{Check, CheckContext};
use crate::config::{PipelineSettings, QcConfig};
use crate::core::{Outcome, ScalarEvent, StationStream, StreamCollection};
use crate::error::ConfigError;
use crate::observability::{CheckMetrics, MetricsCollector, PipelineMonitor};
use crate::registry::CheckRegistry;
use crate::report::QaReport;
use crate::windows::{compute_windows, WindowConfig};

/// Name under which windowing failures are recorded
pub const WINDOWING: &str = "windowing";

struct ConfiguredCheck {
    name: String,
    check: Box<dyn Check>,
    metrics: Arc<CheckMetrics>,
}

/// Ordered QC checks resolved from a configuration.
///
/// Every check is created and validated up front, so a pipeline that was
/// built successfully never raises an error while processing.
pub struct QcPipeline {
    windows: WindowConfig,
    settings: PipelineSettings,
    checks: Vec<ConfiguredCheck>,
    collector: MetricsCollector,
}

impl std::fmt::Debug for QcPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QcPipeline")
            .field("windows", &self.windows)
            .field("settings", &self.settings)
            .field("checks", &self.check_names())
            .finish()
    }
}

impl QcPipeline {
    pub fn from_config(config: QcConfig) -> Result<Self, ConfigError> {
        Self::with_registry(config, &CheckRegistry::builtin())
    }

    pub fn from_json(config: Value) -> Result<Self, ConfigError> {
        Self::from_config(QcConfig::from_json(config)?)
    }

    pub fn with_registry(config: QcConfig, registry: &CheckRegistry) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut checks = Vec::new();
        let mut collector = MetricsCollector::new();
        for (name, params) in config.steps()? {
            let check = registry.create(&name, &params)?;
            let metrics = Arc::new(CheckMetrics::new(name.clone()));
            collector.register(metrics.clone());
            checks.push(ConfiguredCheck { name, check, metrics });
        }

        Ok(Self {
            windows: config.windows,
            settings: config.pipeline,
            checks,
            collector,
        })
    }

    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn monitor(&self) -> PipelineMonitor {
        PipelineMonitor::new(self.collector.clone())
    }

    /// Window the stream, then run every check in configured order
    pub fn process_stream(&self, stream: &mut StationStream, event: &ScalarEvent) {
        let windows = compute_windows(stream, event, &self.windows);
        for (trace, result) in stream.traces_mut().zip(windows) {
            let outcome = match &result {
                Ok(_) => Outcome::pass(),
                Err(e) => Outcome::fail(e.to_string()),
            };
            trace.set_windows(result);
            trace.record(WINDOWING, outcome);
        }

        let ctx = CheckContext { event };
        for configured in &self.checks {
            let start = configured.metrics.start_processing();
            let outcomes = configured.check.check_stream(stream, &ctx);
            configured.metrics.finish_processing(start);

            if outcomes.len() != stream.len() {
                warn!(
                    "{} returned {} outcomes for {} traces of {}",
                    configured.name,
                    outcomes.len(),
                    stream.len(),
                    stream.id()
                );
            }
            let mut outcomes = outcomes.into_iter();
            for trace in stream.traces_mut() {
                let outcome = outcomes.next().unwrap_or_else(|| {
                    Outcome::dependency_failed(format!(
                        "{} returned no outcome for this trace",
                        configured.name
                    ))
                });
                configured.metrics.record(&outcome.verdict);
                trace.record(&configured.name, outcome);
            }
        }
    }

    /// Process every stream of the collection in order and report the result
    pub fn run(&self, collection: &mut StreamCollection, event: &ScalarEvent) -> QaReport {
        info!(
            "Running {} checks on {} streams for event {}",
            self.checks.len(),
            collection.len(),
            event.id
        );
        for stream in collection.streams_mut() {
            self.process_stream(stream, event);
        }
        self.finish(collection)
    }

    pub(crate) fn finish(&self, collection: &StreamCollection) -> QaReport {
        let report = QaReport::from_collection(collection);
        if report.any_failed() {
            if let Some(summary) = report.summary() {
                warn!("{}", summary);
            }
        }
        report
    }
}

