use gmqc_macros::QcCheck;
use serde::Deserialize;

use super::{Check, CheckContext};
use crate::core::{Annotation, Outcome, StationTrace};
use crate::dsp::stats::{demean, zero_crossing_rate};

/// Flags signal windows that barely oscillate (steps, drifts, flat lines)
#[derive(QcCheck, Debug, Clone, Deserialize)]
#[check_meta(
    name = "check_zero_crossings",
    granularity = "trace",
    description = "Fail traces with fewer zero crossings per second than threshold in the signal window"
)]
#[serde(default, deny_unknown_fields)]
pub struct ZeroCrossingsCheck {
    #[param(default = "0.1", min = 0.0)]
    #[serde(alias = "min_crossings")]
    pub threshold: f64,
}

impl Default for ZeroCrossingsCheck {
    fn default() -> Self {
        Self { threshold: 0.1 }
    }
}

impl Check for ZeroCrossingsCheck {
    fn check_trace(&self, trace: &StationTrace, ctx: &CheckContext<'_>) -> Outcome {
        let windows = match ctx.windows(trace) {
            Ok(windows) => windows,
            Err(dependency) => return dependency,
        };

        let signal = demean(&trace.data[windows.signal()]);
        let rate = zero_crossing_rate(&signal, trace.stats.delta());

        let outcome = if rate < self.threshold {
            Outcome::fail(format!(
                "Zero crossing rate of {:.3} per second is below {}.",
                rate, self.threshold
            ))
        } else {
            Outcome::pass()
        };
        outcome.with_annotation(Annotation::ZeroCrossingRate(rate))
    }
}
