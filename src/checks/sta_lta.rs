use anyhow::{bail, Result};
use gmqc_macros::QcCheck;
use serde::Deserialize;

use super::{Check, CheckContext};
use crate::core::{Annotation, Outcome, StationTrace};
use crate::dsp::sta_lta::classic_sta_lta;
use crate::dsp::stats::demean;

/// Requires an impulsive arrival somewhere in the record
#[derive(QcCheck, Debug, Clone, Deserialize)]
#[check_meta(
    name = "check_sta_lta",
    granularity = "trace",
    description = "Fail traces whose maximum STA/LTA ratio does not exceed threshold"
)]
#[serde(default, deny_unknown_fields)]
pub struct StaLtaCheck {
    /// Short-term window in seconds
    #[param(default = "1.0", min = 0.0)]
    pub sta_length: f64,

    /// Long-term window in seconds
    #[param(default = "20.0", min = 0.0)]
    pub lta_length: f64,

    #[param(default = "5.0", min = 0.0)]
    pub threshold: f64,
}

impl Default for StaLtaCheck {
    fn default() -> Self {
        Self {
            sta_length: 1.0,
            lta_length: 20.0,
            threshold: 5.0,
        }
    }
}

impl Check for StaLtaCheck {
    fn prepare(&mut self) -> Result<()> {
        if !(self.sta_length > 0.0 && self.sta_length < self.lta_length) {
            bail!(
                "sta_length ({}) must be positive and shorter than lta_length ({})",
                self.sta_length,
                self.lta_length
            );
        }
        Ok(())
    }

    fn check_trace(&self, trace: &StationTrace, _ctx: &CheckContext<'_>) -> Outcome {
        let sr = trace.stats.sampling_rate;
        let nsta = (self.sta_length * sr).round().max(1.0) as usize;
        let nlta = (self.lta_length * sr).round().max(1.0) as usize;

        let ratio = classic_sta_lta(&demean(&trace.data), nsta, nlta);
        let max_ratio = ratio.iter().copied().fold(0.0, f64::max);

        let outcome = if max_ratio <= self.threshold {
            Outcome::fail(format!(
                "Maximum STA/LTA of {:.2} does not exceed the threshold of {}.",
                max_ratio, self.threshold
            ))
        } else {
            Outcome::pass()
        };
        outcome.with_annotation(Annotation::StaLtaMax(max_ratio))
    }
}
