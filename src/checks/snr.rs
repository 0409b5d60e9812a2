use anyhow::{bail, Result};
use gmqc_macros::QcCheck;
use serde::Deserialize;

use super::{Check, CheckContext};
use crate::core::{Annotation, Outcome, StationTrace};
use crate::dsp::spectrum::snr_spectrum;

/// Signal-to-noise ratio of Konno-Ohmachi smoothed amplitude spectra.
///
/// The SNR spectrum is always stored on the trace so it can be inspected
/// later. With `check` disabled the check only annotates.
#[derive(QcCheck, Debug, Clone, Deserialize)]
#[check_meta(
    name = "compute_snr",
    granularity = "trace",
    description = "Compute the smoothed SNR spectrum and fail traces whose SNR does not exceed threshold in band"
)]
#[serde(default, deny_unknown_fields)]
pub struct SnrCheck {
    /// Konno-Ohmachi bandwidth coefficient
    #[param(default = "20.0", min = 0.0)]
    pub bandwidth: f64,

    #[param(default = "3.0", min = 0.0)]
    pub threshold: f64,

    #[param(default = "0.2", min = 0.0)]
    pub min_freq: f64,

    #[param(default = "5.0", min = 0.0)]
    pub max_freq: f64,

    #[param(default = "true")]
    pub check: bool,

    /// Number of log-spaced smoothing frequencies
    #[param(default = "100", min = 2.0)]
    pub smoothing_points: usize,
}

impl Default for SnrCheck {
    fn default() -> Self {
        Self {
            bandwidth: 20.0,
            threshold: 3.0,
            min_freq: 0.2,
            max_freq: 5.0,
            check: true,
            smoothing_points: 100,
        }
    }
}

impl Check for SnrCheck {
    fn prepare(&mut self) -> Result<()> {
        if !(self.bandwidth > 0.0) {
            bail!("bandwidth must be positive, got {}", self.bandwidth);
        }
        if !(self.min_freq > 0.0 && self.min_freq < self.max_freq) {
            bail!(
                "band needs 0 < min_freq < max_freq, got {} and {}",
                self.min_freq,
                self.max_freq
            );
        }
        Ok(())
    }

    fn check_trace(&self, trace: &StationTrace, ctx: &CheckContext<'_>) -> Outcome {
        let windows = match ctx.windows(trace) {
            Ok(windows) => windows,
            Err(dependency) => return dependency,
        };

        let spectrum = snr_spectrum(
            &trace.data[windows.noise()],
            &trace.data[windows.signal()],
            trace.stats.delta(),
            self.bandwidth,
            self.smoothing_points,
        );

        let outcome = if !self.check {
            Outcome::skipped("SNR computed without a threshold check")
        } else {
            let band: Vec<(f64, f64)> = spectrum.in_band(self.min_freq, self.max_freq).collect();
            match band.iter().find(|(_, snr)| *snr <= self.threshold) {
                _ if band.is_empty() => Outcome::fail(format!(
                    "No SNR frequencies between {} and {} Hz.",
                    self.min_freq, self.max_freq
                )),
                Some((freq, snr)) => Outcome::fail(format!(
                    "SNR of {:.2} at {:.3} Hz does not exceed the threshold of {}.",
                    snr, freq, self.threshold
                )),
                None => Outcome::pass(),
            }
        };
        outcome.with_annotation(Annotation::Snr(spectrum))
    }
}
