use std::ops::Range;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Noise and signal intervals of one trace, as sample indices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalWindows {
    pub split_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub split_method: String,
    pub split_index: usize,
    pub end_index: usize,
}

impl SignalWindows {
    pub fn noise(&self) -> Range<usize> {
        0..self.split_index
    }

    pub fn signal(&self) -> Range<usize> {
        self.split_index..self.end_index
    }
}

/// Why no usable windows could be derived for a trace
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum WindowError {
    #[error("insufficient noise window: {available:.2} s available, {required:.2} s required")]
    InsufficientNoise { available: f64, required: f64 },

    #[error("insufficient signal window: {available:.2} s available, {required:.2} s required")]
    InsufficientSignal { available: f64, required: f64 },

    #[error("cannot window record: {0}")]
    InvalidEvent(String),

    #[error("{what} of {offset_s} s after origin is outside the supported time range")]
    TimeOutOfRange { what: String, offset_s: f64 },
}
