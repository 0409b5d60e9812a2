use anyhow::{bail, Result};
use gmqc_macros::QcCheck;
use serde::Deserialize;

use super::{Check, CheckContext};
use crate::core::{Outcome, StationTrace, Units};
use crate::dsp::stats::peak_abs;

/// Clipping and dead-channel screen on raw counts.
///
/// Strong-motion sensors rarely clip at the amplitudes this targets, so they
/// are skipped, as are traces that are no longer in counts.
#[derive(QcCheck, Debug, Clone, Deserialize)]
#[check_meta(
    name = "check_max_amplitude",
    granularity = "trace",
    description = "Fail traces whose peak count is above max or below min"
)]
#[serde(default, deny_unknown_fields)]
pub struct MaxAmplitudeCheck {
    #[param(default = "5.0", min = 0.0)]
    pub min: f64,

    #[param(default = "2000000.0", min = 0.0)]
    pub max: f64,
}

impl Default for MaxAmplitudeCheck {
    fn default() -> Self {
        Self {
            min: 5.0,
            max: 2e6,
        }
    }
}

impl Check for MaxAmplitudeCheck {
    fn prepare(&mut self) -> Result<()> {
        if self.min > self.max {
            bail!("min ({}) must not exceed max ({})", self.min, self.max);
        }
        Ok(())
    }

    fn check_trace(&self, trace: &StationTrace, _ctx: &CheckContext<'_>) -> Outcome {
        if trace.is_strong_motion() {
            return Outcome::skipped("strong-motion instrument");
        }
        if trace.stats.standard.units != Units::Counts {
            return Outcome::skipped("data are not in counts");
        }

        let peak = peak_abs(&trace.data);
        if peak > self.max {
            Outcome::fail(format!(
                "Maximum amplitude of {} exceeds the allowed maximum of {}.",
                peak, self.max
            ))
        } else if peak < self.min {
            Outcome::fail(format!(
                "Maximum amplitude of {} is below the allowed minimum of {}.",
                peak, self.min
            ))
        } else {
            Outcome::pass()
        }
    }
}
