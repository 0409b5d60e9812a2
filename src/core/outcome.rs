use serde::{Deserialize, Serialize};

use super::params::{SnrSpectrum, TailRatios};

/// Decision reached by one check for one trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail(String),
    /// A prerequisite (usually the signal windows) is missing or failed
    DependencyFailed(String),
    /// The check does not apply to this trace
    Skipped(String),
}

impl Verdict {
    /// Reason carried by a failing verdict
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Fail(reason) | Self::DependencyFailed(reason) => Some(reason),
            Self::Pass | Self::Skipped(_) => None,
        }
    }
}

/// Measured value a check attaches to a trace, whatever its verdict
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    StaLtaMax(f64),
    ZeroCrossingRate(f64),
    Snr(SnrSpectrum),
    NnetScore(f64),
    TailRatios(TailRatios),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub verdict: Verdict,
    pub annotation: Option<Annotation>,
}

impl Outcome {
    pub fn pass() -> Self {
        Self::from(Verdict::Pass)
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self::from(Verdict::Fail(reason.into()))
    }

    pub fn dependency_failed(reason: impl Into<String>) -> Self {
        Self::from(Verdict::DependencyFailed(reason.into()))
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::from(Verdict::Skipped(reason.into()))
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotation = Some(annotation);
        self
    }
}

impl From<Verdict> for Outcome {
    fn from(verdict: Verdict) -> Self {
        Self {
            verdict,
            annotation: None,
        }
    }
}

/// Audit-trail entry: what one check concluded about a trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRecord {
    pub check: String,
    pub verdict: Verdict,
}
