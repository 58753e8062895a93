//! Money Flow Index.
//!
//! Typical price TP = (H + L + C) / 3, raw flow = TP * V. A row's flow is
//! positive when TP rises from the previous row and negative when it falls.
//! MFI = 100 * positive / (positive + negative) over the trailing n changes.
//! Warmup: first n rows are NaN. No flow in either direction gives 50.

use crate::domain::price_table::PriceRecord;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_mfi(records: &[PriceRecord], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; records.len()];
    if period == 0 || records.len() <= period {
        return out;
    }

    let tp: Vec<f64> = records.iter().map(|r| r.typical_price()).collect();
    let mut pos = vec![0.0; records.len()];
    let mut neg = vec![0.0; records.len()];
    for i in 1..records.len() {
        let flow = tp[i] * records[i].volume;
        if tp[i] > tp[i - 1] {
            pos[i] = flow;
        } else if tp[i] < tp[i - 1] {
            neg[i] = flow;
        }
    }

    for i in period..records.len() {
        let p: f64 = pos[i + 1 - period..=i].iter().sum();
        let n: f64 = neg[i + 1 - period..=i].iter().sum();
        out[i] = if p + n == 0.0 { 50.0 } else { 100.0 * p / (p + n) };
    }

    out
}
