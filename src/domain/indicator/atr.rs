//! Average True Range (Wilder).
//!
//! TR[0] = high - low, TR[i] = max(high - low, |high - C[i-1]|, |low - C[i-1]|).
//! Seed with the mean of the first n TRs, then ATR = (prev * (n-1) + TR) / n.
//! Warmup: first (n-1) rows are NaN.

use crate::domain::price_table::PriceRecord;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_atr(records: &[PriceRecord], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; records.len()];
    if period == 0 || records.len() < period {
        return out;
    }

    let tr: Vec<f64> = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            if i == 0 {
                r.high - r.low
            } else {
                r.true_range(records[i - 1].close)
            }
        })
        .collect();

    let mut atr = tr[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = atr;
    for i in period..records.len() {
        atr = (atr * (period - 1) as f64 + tr[i]) / period as f64;
        out[i] = atr;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price_table::TradeDate;
    use approx::assert_relative_eq;

    fn bar(day: u32, high: f64, low: f64, close: f64) -> PriceRecord {
        PriceRecord {
            date: TradeDate::parse(&format!("2024-01-{day:02}")).unwrap(),
            open: close,
            high,
            low,
            close,
            adj_close: None,
            volume: 1000.0,
        }
    }

    #[test]
    fn warmup_and_seed() {
        let bars = vec![
            bar(1, 12.0, 8.0, 10.0),
            bar(2, 13.0, 9.0, 12.0),
            bar(3, 20.0, 15.0, 18.0),
        ];
        let atr = calculate_atr(&bars, 2);
        assert!(atr[0].is_nan());
        // TR: 4, 4 → seed 4
        assert_relative_eq!(atr[1], 4.0);
        // TR[2] = max(5, 8, 3) = 8 → (4 + 8) / 2
        assert_relative_eq!(atr[2], 6.0);
    }

    #[test]
    fn too_short_is_all_nan() {
        let atr = calculate_atr(&[bar(1, 2.0, 1.0, 1.5)], DEFAULT_PERIOD);
        assert!(atr[0].is_nan());
    }
}
