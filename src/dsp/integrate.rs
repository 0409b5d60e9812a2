/// Cumulative trapezoidal integral, starting at zero
pub fn cumulative_trapezoid(data: &[f64], dt: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(data.len());
    let mut acc = 0.0;
    for (i, x) in data.iter().enumerate() {
        if i > 0 {
            acc += 0.5 * (data[i - 1] + x) * dt;
        }
        out.push(acc);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_of_constant_is_ramp() {
        let out = cumulative_trapezoid(&[2.0; 5], 0.5);
        assert_eq!(out, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_integral_of_empty() {
        assert!(cumulative_trapezoid(&[], 0.01).is_empty());
    }
}
