//! Error types for configuration and input handling.
//!
//! Data-quality failures are not errors: they are recorded on the traces.
//! The types here cover what stops a run (`ConfigError`) and what excludes
//! a single trace from the batch (`InputError`).

use thiserror::Error;

/// Problems found while loading or resolving the QC configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown check '{0}'")]
    UnknownCheck(String),

    #[error("Malformed check entry #{index}: {message}")]
    MalformedStep { index: usize, message: String },

    #[error("Parameters for '{check}' must be an object")]
    MalformedParameters { check: String },

    #[error("Missing required parameter '{param}' for '{check}'")]
    MissingParameter { check: String, param: String },

    #[error("Parameter '{param}' of '{check}' is {value}, allowed range is [{lo}, {hi}]",
        lo = .min.map(|v| v.to_string()).unwrap_or_else(|| "-inf".to_string()),
        hi = .max.map(|v| v.to_string()).unwrap_or_else(|| "inf".to_string()))]
    OutOfRange {
        check: String,
        param: String,
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },

    #[error("Invalid parameters for '{check}': {source}")]
    InvalidParameters {
        check: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration for '{check}': {message}")]
    InvalidParameter { check: String, message: String },

    #[error("Invalid window configuration: {0}")]
    InvalidWindows(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A trace that cannot enter the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{source_file}: trace {trace_id} has no samples")]
    EmptyData { source_file: String, trace_id: String },

    #[error("{source_file}: trace {trace_id} has invalid sampling rate {sampling_rate}")]
    InvalidSamplingRate {
        source_file: String,
        trace_id: String,
        sampling_rate: f64,
    },

    #[error("{source_file}: trace {trace_id} contains non-finite samples")]
    NonFiniteSamples { source_file: String, trace_id: String },

    #[error("{source_file}: trace {trace_id} has malformed channel code '{channel}'")]
    MalformedChannel {
        source_file: String,
        trace_id: String,
        channel: String,
    },
}

impl InputError {
    pub fn source_file(&self) -> &str {
        match self {
            Self::EmptyData { source_file, .. }
            | Self::InvalidSamplingRate { source_file, .. }
            | Self::NonFiniteSamples { source_file, .. }
            | Self::MalformedChannel { source_file, .. } => source_file,
        }
    }
}
