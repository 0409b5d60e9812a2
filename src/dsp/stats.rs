pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

pub fn demean(data: &[f64]) -> Vec<f64> {
    let m = mean(data);
    data.iter().map(|x| x - m).collect()
}

pub fn peak_abs(data: &[f64]) -> f64 {
    data.iter().fold(0.0, |acc: f64, x| acc.max(x.abs()))
}

pub fn mean_abs(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().map(|x| x.abs()).sum::<f64>() / data.len() as f64
}

pub fn rms(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    (data.iter().map(|x| x * x).sum::<f64>() / data.len() as f64).sqrt()
}

/// Sign changes per second
pub fn zero_crossing_rate(data: &[f64], dt: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let crossings = data.windows(2).filter(|w| w[0] * w[1] < 0.0).count();
    crossings as f64 / (data.len() as f64 * dt)
}

/// log10 that stays finite for zero or negative input
pub fn safe_log10(x: f64) -> f64 {
    x.max(1e-12).log10()
}
