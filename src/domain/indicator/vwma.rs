//! Volume Weighted Moving Average.
//!
//! VWMA(n)[i] = sum(C * V) / sum(V) over the trailing n rows, using the
//! partial window at the start. Zero total volume gives NaN.

use crate::domain::price_table::PriceRecord;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_vwma(records: &[PriceRecord], period: usize) -> Vec<f64> {
    records
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if period == 0 {
                return f64::NAN;
            }
            let start = (i + 1).saturating_sub(period);
            let window = &records[start..=i];
            let pv: f64 = window.iter().map(|r| r.close * r.volume).sum();
            let v: f64 = window.iter().map(|r| r.volume).sum();
            if v == 0.0 { f64::NAN } else { pv / v }
        })
        .collect()
}
