/// Classic short-term/long-term average ratio of the squared signal.
///
/// The first `nlta - 1` values are zero because the long-term window is not
/// yet full. A record shorter than the long-term window yields all zeros.
pub fn classic_sta_lta(data: &[f64], nsta: usize, nlta: usize) -> Vec<f64> {
    let n = data.len();
    let mut ratio = vec![0.0; n];
    if nsta == 0 || nlta == 0 || n < nlta {
        return ratio;
    }

    let mut cumsum = Vec::with_capacity(n);
    let mut running = 0.0;
    for x in data {
        running += x * x;
        cumsum.push(running);
    }

    let window_mean = |i: usize, len: usize| -> f64 {
        let upper = cumsum[i];
        let lower = if i >= len { cumsum[i - len] } else { 0.0 };
        (upper - lower) / len as f64
    };

    for (i, value) in ratio.iter_mut().enumerate().skip(nlta - 1) {
        let lta = window_mean(i, nlta);
        if lta > f64::EPSILON * f64::EPSILON {
            *value = window_mean(i, nsta) / lta;
        }
    }

    ratio
}

/// Index of the first value at or above `threshold`
pub fn first_trigger(ratio: &[f64], threshold: f64) -> Option<usize> {
    ratio.iter().position(|&r| r >= threshold)
}
