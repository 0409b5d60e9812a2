use serde::{Deserialize, Serialize};

use super::outcome::Annotation;
use crate::windows::{SignalWindows, WindowError};

/// Smoothed signal-to-noise ratio sampled at log-spaced frequencies
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SnrSpectrum {
    pub bandwidth: f64,
    pub freqs: Vec<f64>,
    pub snr: Vec<f64>,
}

impl SnrSpectrum {
    /// (frequency, snr) pairs inside `[min_freq, max_freq]`
    pub fn in_band(&self, min_freq: f64, max_freq: f64) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.freqs
            .iter()
            .zip(&self.snr)
            .filter(move |(f, _)| **f >= min_freq && **f <= max_freq)
            .map(|(f, s)| (*f, *s))
    }
}

/// Tail-to-peak ratios of integrated velocity and displacement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TailRatios {
    pub velocity: f64,
    pub displacement: f64,
}

/// Values computed for a trace while it moves through the pipeline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TraceParameters {
    pub windows: Option<Result<SignalWindows, WindowError>>,
    pub sta_lta_max: Option<f64>,
    pub zero_crossing_rate: Option<f64>,
    pub snr: Option<SnrSpectrum>,
    pub nnet_score: Option<f64>,
    pub tail_ratios: Option<TailRatios>,
}

impl TraceParameters {
    /// Signal windows, or the reason a dependent check cannot run
    pub fn signal_windows(&self) -> Result<&SignalWindows, String> {
        match &self.windows {
            Some(Ok(windows)) => Ok(windows),
            Some(Err(e)) => Err(e.to_string()),
            None => Err("signal windows were not computed".to_string()),
        }
    }

    pub fn apply(&mut self, annotation: Annotation) {
        match annotation {
            Annotation::StaLtaMax(ratio) => self.sta_lta_max = Some(ratio),
            Annotation::ZeroCrossingRate(rate) => self.zero_crossing_rate = Some(rate),
            Annotation::Snr(spectrum) => self.snr = Some(spectrum),
            Annotation::NnetScore(score) => self.nnet_score = Some(score),
            Annotation::TailRatios(ratios) => self.tail_ratios = Some(ratios),
        }
    }
}
