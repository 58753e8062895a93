//! Moving standard deviation.
//!
//! Sample standard deviation (divides by N-1) of the non-NaN values in the
//! trailing window; partial windows at the start are used as-is. Fewer than
//! two values gives NaN.

pub fn calculate_mstd(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        if period == 0 {
            out.push(f64::NAN);
            continue;
        }
        let start = (i + 1).saturating_sub(period);
        let window: Vec<f64> = values[start..=i]
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .collect();

        if window.len() < 2 {
            out.push(f64::NAN);
            continue;
        }

        let n = window.len() as f64;
        let mean = window.iter().sum::<f64>() / n;
        let variance = window
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / (n - 1.0);
        out.push(variance.sqrt());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn single_value_is_nan() {
        let s = calculate_mstd(&[5.0, 7.0], 3);
        assert!(s[0].is_nan());
    }

    #[test]
    fn sample_deviation() {
        // 2, 4, 4, 4, 5, 5, 7, 9: sample variance = 32/7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let s = calculate_mstd(&values, 8);
        assert_relative_eq!(s[7], (32.0f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn window_slides() {
        let s = calculate_mstd(&[100.0, 1.0, 1.0, 1.0], 3);
        assert_relative_eq!(s[3], 0.0);
    }

    #[test]
    fn constant_series_is_zero() {
        let s = calculate_mstd(&[3.0; 4], 2);
        assert_relative_eq!(s[3], 0.0);
    }
}
