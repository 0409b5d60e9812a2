use anyhow::{bail, Result};
use gmqc_macros::QcCheck;
use serde::Deserialize;

use super::{Check, CheckContext};
use crate::core::{Annotation, Outcome, StationTrace, TailRatios, Units};
use crate::dsp::integrate::cumulative_trapezoid;
use crate::dsp::stats::{mean_abs, peak_abs};

/// Detects baseline problems from the end of integrated records.
///
/// A well-behaved acceleration record integrates to velocity and
/// displacement that settle near zero; a large tail relative to the peak
/// points at a baseline offset. Only acceleration traces are examined.
#[derive(QcCheck, Debug, Clone, Deserialize)]
#[check_meta(
    name = "check_tail",
    granularity = "trace",
    description = "Fail acceleration traces whose integrated velocity or displacement tail is large relative to the peak"
)]
#[serde(default, deny_unknown_fields)]
pub struct TailCheck {
    /// Tail length in seconds
    #[param(default = "5.0", min = 0.0)]
    pub duration: f64,

    #[param(default = "0.3", min = 0.0)]
    pub max_vel_ratio: f64,

    #[param(default = "0.9", min = 0.0)]
    pub max_dis_ratio: f64,
}

impl Default for TailCheck {
    fn default() -> Self {
        Self {
            duration: 5.0,
            max_vel_ratio: 0.3,
            max_dis_ratio: 0.9,
        }
    }
}

fn tail_ratio(data: &[f64], tail_len: usize) -> f64 {
    let peak = peak_abs(data);
    if peak == 0.0 {
        return 0.0;
    }
    let start = data.len().saturating_sub(tail_len);
    mean_abs(&data[start..]) / peak
}

impl Check for TailCheck {
    fn prepare(&mut self) -> Result<()> {
        if !(self.duration > 0.0) {
            bail!("duration must be positive, got {}", self.duration);
        }
        Ok(())
    }

    fn check_trace(&self, trace: &StationTrace, _ctx: &CheckContext<'_>) -> Outcome {
        if trace.stats.standard.units != Units::Acceleration {
            return Outcome::skipped("data are not acceleration");
        }

        let dt = trace.stats.delta();
        let tail_len = ((self.duration / dt).round() as usize).max(1);
        let velocity = cumulative_trapezoid(&trace.data, dt);
        let displacement = cumulative_trapezoid(&velocity, dt);

        let ratios = TailRatios {
            velocity: tail_ratio(&velocity, tail_len),
            displacement: tail_ratio(&displacement, tail_len),
        };

        let outcome = if ratios.velocity > self.max_vel_ratio {
            Outcome::fail(format!(
                "Velocity tail ratio of {:.3} exceeds {}.",
                ratios.velocity, self.max_vel_ratio
            ))
        } else if ratios.displacement > self.max_dis_ratio {
            Outcome::fail(format!(
                "Displacement tail ratio of {:.3} exceeds {}.",
                ratios.displacement, self.max_dis_ratio
            ))
        } else {
            Outcome::pass()
        };
        outcome.with_annotation(Annotation::TailRatios(ratios))
    }
}
