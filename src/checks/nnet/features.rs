//! Engineered waveform features fed to the QA network.

use crate::core::StationTrace;
use crate::dsp::spectrum::snr_spectrum;
use crate::dsp::stats::{demean, peak_abs, rms, safe_log10, zero_crossing_rate};
use crate::windows::SignalWindows;

pub const FEATURE_COUNT: usize = 11;

/// Bands (Hz) over which the smoothed SNR is averaged
pub const SNR_BANDS: [(f64, f64); 6] = [
    (0.1, 0.5),
    (0.5, 1.0),
    (1.0, 2.0),
    (2.0, 5.0),
    (5.0, 10.0),
    (10.0, 20.0),
];

const SMOOTHING_BANDWIDTH: f64 = 20.0;
const SMOOTHING_POINTS: usize = 100;

/// Feature vector, in order:
/// log10 peak signal, log10 peak noise, log10 signal/noise RMS ratio,
/// log10 mean SNR per band in [`SNR_BANDS`], signal zero-crossing rate,
/// log10 signal duration.
pub fn qa_features(trace: &StationTrace, windows: &SignalWindows) -> [f64; FEATURE_COUNT] {
    let dt = trace.stats.delta();
    let noise = demean(&trace.data[windows.noise()]);
    let signal = demean(&trace.data[windows.signal()]);

    let mut features = [0.0; FEATURE_COUNT];
    features[0] = safe_log10(peak_abs(&signal));
    features[1] = safe_log10(peak_abs(&noise));
    features[2] = safe_log10(rms(&signal) / rms(&noise).max(f64::MIN_POSITIVE));

    let spectrum = snr_spectrum(&noise, &signal, dt, SMOOTHING_BANDWIDTH, SMOOTHING_POINTS);
    for (slot, (lo, hi)) in features[3..9].iter_mut().zip(SNR_BANDS) {
        let values: Vec<f64> = spectrum.in_band(lo, hi).map(|(_, snr)| snr).collect();
        if !values.is_empty() {
            *slot = safe_log10(values.iter().sum::<f64>() / values.len() as f64);
        }
    }

    features[9] = zero_crossing_rate(&signal, dt);
    features[10] = safe_log10(signal.len() as f64 * dt);
    features
}
