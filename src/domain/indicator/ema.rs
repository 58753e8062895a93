//! Exponential Moving Average.
//!
//! Span-based with adjusted weights: alpha = 2/(n+1), w = 1 - alpha,
//! EMA[i] = sum(w^j * x[i-j]) / sum(w^j) over all j <= i.
//! Computed recursively as num = x + w*num, den = 1 + w*den.
//! A NaN input decays the running weights and repeats the previous value.

pub fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![f64::NAN; values.len()];
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let w = 1.0 - alpha;
    let mut num = 0.0;
    let mut den = 0.0;
    let mut out = Vec::with_capacity(values.len());

    for &x in values {
        if x.is_nan() {
            num *= w;
            den *= w;
        } else {
            num = x + w * num;
            den = 1.0 + w * den;
        }
        out.push(if den > 0.0 { num / den } else { f64::NAN });
    }

    out
}
