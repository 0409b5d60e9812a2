use gmqc_macros::QcCheck;
use serde::Deserialize;

use super::{Check, CheckContext};
use crate::core::{Outcome, StationTrace};

#[derive(QcCheck, Debug, Clone, Deserialize)]
#[check_meta(
    name = "min_sample_rate",
    granularity = "trace",
    description = "Fail traces sampled below a minimum rate"
)]
#[serde(default, deny_unknown_fields)]
pub struct MinSampleRateCheck {
    /// Samples per second
    #[param(default = "20.0", min = 0.0)]
    pub min_sps: f64,
}

impl Default for MinSampleRateCheck {
    fn default() -> Self {
        Self { min_sps: 20.0 }
    }
}

impl Check for MinSampleRateCheck {
    fn check_trace(&self, trace: &StationTrace, _ctx: &CheckContext<'_>) -> Outcome {
        let rate = trace.stats.sampling_rate;
        if rate < self.min_sps {
            Outcome::fail(format!(
                "Minimum sample rate of {} not exceeded ({} sps).",
                self.min_sps, rate
            ))
        } else {
            Outcome::pass()
        }
    }
}
