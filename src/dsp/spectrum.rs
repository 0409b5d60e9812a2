use rustfft::{num_complex::Complex, FftPlanner};

use super::stats::demean;
use crate::core::SnrSpectrum;

/// Smallest power of two not below `n`
pub fn next_pow2(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Non-negative FFT frequencies for an `nfft`-point transform
pub fn rfft_freqs(nfft: usize, dt: f64) -> Vec<f64> {
    (0..=nfft / 2)
        .map(|i| i as f64 / (nfft as f64 * dt))
        .collect()
}

/// Fourier amplitude spectrum `|FFT(x)| * dt` of the zero-padded samples,
/// non-negative frequencies only
pub fn amplitude_spectrum(samples: &[f64], dt: f64, nfft: usize) -> Vec<f64> {
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nfft);

    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .take(nfft)
        .map(|&s| Complex::new(s, 0.0))
        .collect();
    buffer.resize(nfft, Complex::new(0.0, 0.0));

    fft.process(&mut buffer);

    buffer
        .iter()
        .take(nfft / 2 + 1)
        .map(|bin| bin.norm() * dt)
        .collect()
}

/// `n` frequencies evenly spaced in log10 between `min` and `max`
pub fn log_spaced(min: f64, max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let (lo, hi) = (min.log10(), max.log10());
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|i| 10f64.powf(lo + step * i as f64)).collect()
        }
    }
}

/// Konno-Ohmachi window `[sin(b log10(f/fc)) / (b log10(f/fc))]^4`
pub fn konno_ohmachi_weight(f: f64, fc: f64, bandwidth: f64) -> f64 {
    if f <= 0.0 || fc <= 0.0 {
        return 0.0;
    }
    let x = bandwidth * (f / fc).log10();
    if x.abs() < 1e-12 {
        1.0
    } else {
        (x.sin() / x).powi(4)
    }
}

/// Smooth `amps` (sampled at `freqs`) at each of the `centers`
pub fn konno_ohmachi_smooth(freqs: &[f64], amps: &[f64], centers: &[f64], bandwidth: f64) -> Vec<f64> {
    centers
        .iter()
        .map(|&fc| {
            let (num, den) = freqs
                .iter()
                .zip(amps)
                .fold((0.0, 0.0), |(num, den), (&f, &a)| {
                    let w = konno_ohmachi_weight(f, fc, bandwidth);
                    (num + w * a, den + w)
                });
            if den > 0.0 {
                num / den
            } else {
                0.0
            }
        })
        .collect()
}

/// Ratio of smoothed signal and noise amplitude spectra.
///
/// Both windows are demeaned and transformed at a common power-of-two
/// length; each spectrum is divided by the square root of its window
/// duration so windows of different length compare on the same footing.
/// Smoothing frequencies run from the lowest non-zero FFT frequency to
/// Nyquist.
pub fn snr_spectrum(noise: &[f64], signal: &[f64], dt: f64, bandwidth: f64, points: usize) -> SnrSpectrum {
    let nfft = next_pow2(noise.len().max(signal.len()));
    if nfft < 2 || noise.is_empty() || signal.is_empty() {
        return SnrSpectrum {
            bandwidth,
            ..SnrSpectrum::default()
        };
    }

    let freqs = rfft_freqs(nfft, dt);
    let normalized = |data: &[f64]| -> Vec<f64> {
        let scale = 1.0 / (data.len() as f64 * dt).sqrt();
        amplitude_spectrum(&demean(data), dt, nfft)
            .into_iter()
            .map(|a| a * scale)
            .collect()
    };
    let noise_amp = normalized(noise);
    let signal_amp = normalized(signal);

    let nyquist = 0.5 / dt;
    let centers = log_spaced(freqs[1], nyquist, points);
    let smooth_noise = konno_ohmachi_smooth(&freqs, &noise_amp, &centers, bandwidth);
    let smooth_signal = konno_ohmachi_smooth(&freqs, &signal_amp, &centers, bandwidth);

    let snr = smooth_signal
        .iter()
        .zip(&smooth_noise)
        .map(|(&s, &n)| if s == 0.0 { 0.0 } else { s / n.max(f64::MIN_POSITIVE) })
        .collect();

    SnrSpectrum {
        bandwidth,
        freqs: centers,
        snr,
    }
}
