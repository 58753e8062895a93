//! Bollinger Bands.
//!
//! - Middle: SMA over n periods
//! - Upper: Middle + (multiplier × moving StdDev)
//! - Lower: Middle - (multiplier × moving StdDev)
//!
//! Default parameters: period=20, multiplier=2.0

use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stddev::calculate_mstd;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn calculate_bollinger(closes: &[f64], period: usize, multiplier: f64) -> BollingerSeries {
    let middle = calculate_sma(closes, period);
    let std = calculate_mstd(closes, period);

    let upper = middle
        .iter()
        .zip(&std)
        .map(|(m, s)| m + multiplier * s)
        .collect();
    let lower = middle
        .iter()
        .zip(&std)
        .map(|(m, s)| m - multiplier * s)
        .collect();

    BollingerSeries {
        upper,
        middle,
        lower,
    }
}
