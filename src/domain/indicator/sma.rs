//! Simple Moving Average.
//!
//! SMA(n)[i] = mean of the non-NaN values in x[i-n+1..=i]. Windows shorter
//! than n at the start of the series are averaged over what is available,
//! so the first row already has a value.

pub fn calculate_sma(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![f64::NAN; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    let mut count = 0usize;

    for i in 0..values.len() {
        let x = values[i];
        if !x.is_nan() {
            sum += x;
            count += 1;
        }
        if i >= period {
            let old = values[i - period];
            if !old.is_nan() {
                sum -= old;
                count -= 1;
            }
        }
        out.push(if count == 0 { f64::NAN } else { sum / count as f64 });
    }

    out
}
