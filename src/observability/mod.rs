pub mod metrics;
pub mod collector;
pub mod monitor;

pub use metrics::CheckMetrics;
pub use collector::{MetricsCollector, MetricsSnapshot};
pub use monitor::PipelineMonitor;
