pub mod checks;
pub mod config;
pub mod core;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod input;
pub mod metrics;
pub mod observability;
pub mod registry;
pub mod report;
pub mod windows;

pub use config::QcConfig;
pub use engine::{PipelinePool, QcPipeline};
pub use error::{ConfigError, InputError};
pub use report::{FailureRecord, QaReport};
