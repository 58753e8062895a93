//! Built-in technical indicators, addressed by stockstats-style column names.
//!
//! This module provides:
//! - `IndicatorSpec`: a parsed indicator name (`close_10_sma`, `macdh`, `rsi_6`, ...)
//! - `StockstatsEngine`: the [`IndicatorEngine`] that adds the named column to a table
//!
//! Each calculation returns one value per table row; rows without enough
//! history hold `NaN`.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod mfi;
pub mod rsi;
pub mod sma;
pub mod stddev;
pub mod vwma;

use crate::domain::error::TickstatsError;
use crate::domain::price_table::PriceTable;
use crate::ports::indicator_port::IndicatorEngine;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorSpec {
    Sma { column: String, period: usize },
    Ema { column: String, period: usize },
    Mstd { column: String, period: usize },
    Macd,
    MacdSignal,
    MacdHistogram,
    Rsi(usize),
    BollMiddle,
    BollUpper,
    BollLower,
    Atr(usize),
    Vwma(usize),
    Mfi(usize),
}

/// Name patterns understood by [`StockstatsEngine`], with a short description.
pub const SUPPORTED: &[(&str, &str)] = &[
    ("{column}_{n}_sma", "simple moving average of a column over n rows"),
    ("{column}_{n}_ema", "exponential moving average of a column, span n"),
    ("{column}_{n}_mstd", "moving sample standard deviation of a column"),
    ("macd", "MACD line, EMA(12) - EMA(26) of close"),
    ("macds", "MACD signal line, EMA(9) of macd"),
    ("macdh", "MACD histogram, macd - macds"),
    ("rsi | rsi_{n}", "relative strength index, Wilder smoothing, default n = 14"),
    ("boll", "Bollinger middle band, 20-row SMA of close"),
    ("boll_ub", "Bollinger upper band, boll + 2 standard deviations"),
    ("boll_lb", "Bollinger lower band, boll - 2 standard deviations"),
    ("atr | atr_{n}", "average true range, default n = 14"),
    ("vwma | vwma_{n}", "volume weighted moving average of close, default n = 14"),
    ("mfi | mfi_{n}", "money flow index, default n = 14"),
];

fn unknown(name: &str) -> TickstatsError {
    TickstatsError::UnknownIndicator {
        name: name.to_string(),
    }
}

fn parse_period(raw: &str, name: &str) -> Result<usize, TickstatsError> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(unknown(name)),
    }
}

impl FromStr for IndicatorSpec {
    type Err = TickstatsError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let simple = match name {
            "macd" => Some(IndicatorSpec::Macd),
            "macds" => Some(IndicatorSpec::MacdSignal),
            "macdh" => Some(IndicatorSpec::MacdHistogram),
            "rsi" => Some(IndicatorSpec::Rsi(rsi::DEFAULT_PERIOD)),
            "boll" => Some(IndicatorSpec::BollMiddle),
            "boll_ub" => Some(IndicatorSpec::BollUpper),
            "boll_lb" => Some(IndicatorSpec::BollLower),
            "atr" => Some(IndicatorSpec::Atr(atr::DEFAULT_PERIOD)),
            "vwma" => Some(IndicatorSpec::Vwma(vwma::DEFAULT_PERIOD)),
            "mfi" => Some(IndicatorSpec::Mfi(mfi::DEFAULT_PERIOD)),
            _ => None,
        };
        if let Some(spec) = simple {
            return Ok(spec);
        }

        // `{column}_{n}_{kind}`; the column itself may contain underscores
        let parts: Vec<&str> = name.rsplitn(3, '_').collect();
        if let [kind, period, column] = parts.as_slice() {
            let column = column.to_string();
            match *kind {
                "sma" => {
                    let period = parse_period(period, name)?;
                    return Ok(IndicatorSpec::Sma { column, period });
                }
                "ema" => {
                    let period = parse_period(period, name)?;
                    return Ok(IndicatorSpec::Ema { column, period });
                }
                "mstd" => {
                    let period = parse_period(period, name)?;
                    return Ok(IndicatorSpec::Mstd { column, period });
                }
                _ => {}
            }
        }

        if let Some((prefix, period)) = name.split_once('_') {
            let period = parse_period(period, name)?;
            return match prefix {
                "rsi" => Ok(IndicatorSpec::Rsi(period)),
                "atr" => Ok(IndicatorSpec::Atr(period)),
                "vwma" => Ok(IndicatorSpec::Vwma(period)),
                "mfi" => Ok(IndicatorSpec::Mfi(period)),
                _ => Err(unknown(name)),
            };
        }

        Err(unknown(name))
    }
}

impl fmt::Display for IndicatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorSpec::Sma { column, period } => write!(f, "SMA({}, {})", column, period),
            IndicatorSpec::Ema { column, period } => write!(f, "EMA({}, {})", column, period),
            IndicatorSpec::Mstd { column, period } => write!(f, "MSTD({}, {})", column, period),
            IndicatorSpec::Macd => write!(f, "MACD"),
            IndicatorSpec::MacdSignal => write!(f, "MACD_SIGNAL"),
            IndicatorSpec::MacdHistogram => write!(f, "MACD_HIST"),
            IndicatorSpec::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorSpec::BollMiddle => write!(f, "BOLL"),
            IndicatorSpec::BollUpper => write!(f, "BOLL_UB"),
            IndicatorSpec::BollLower => write!(f, "BOLL_LB"),
            IndicatorSpec::Atr(period) => write!(f, "ATR({})", period),
            IndicatorSpec::Vwma(period) => write!(f, "VWMA({})", period),
            IndicatorSpec::Mfi(period) => write!(f, "MFI({})", period),
        }
    }
}

impl IndicatorSpec {
    /// One value per row of `table`.
    pub fn evaluate(&self, table: &PriceTable) -> Result<Vec<f64>, TickstatsError> {
        let source = |column: &str| {
            table.column(column).ok_or_else(|| TickstatsError::UnknownIndicator {
                name: format!("{self} (no column '{column}')"),
            })
        };

        let values = match self {
            IndicatorSpec::Sma { column, period } => sma::calculate_sma(&source(column)?, *period),
            IndicatorSpec::Ema { column, period } => ema::calculate_ema(&source(column)?, *period),
            IndicatorSpec::Mstd { column, period } => {
                stddev::calculate_mstd(&source(column)?, *period)
            }
            IndicatorSpec::Macd | IndicatorSpec::MacdSignal | IndicatorSpec::MacdHistogram => {
                let m = macd::calculate_macd(
                    &source("close")?,
                    macd::DEFAULT_FAST,
                    macd::DEFAULT_SLOW,
                    macd::DEFAULT_SIGNAL,
                );
                match self {
                    IndicatorSpec::Macd => m.line,
                    IndicatorSpec::MacdSignal => m.signal,
                    _ => m.histogram,
                }
            }
            IndicatorSpec::Rsi(period) => rsi::calculate_rsi(&source("close")?, *period),
            IndicatorSpec::BollMiddle | IndicatorSpec::BollUpper | IndicatorSpec::BollLower => {
                let b = bollinger::calculate_bollinger(
                    &source("close")?,
                    bollinger::DEFAULT_PERIOD,
                    bollinger::DEFAULT_MULTIPLIER,
                );
                match self {
                    IndicatorSpec::BollMiddle => b.middle,
                    IndicatorSpec::BollUpper => b.upper,
                    _ => b.lower,
                }
            }
            IndicatorSpec::Atr(period) => atr::calculate_atr(table.records(), *period),
            IndicatorSpec::Vwma(period) => vwma::calculate_vwma(table.records(), *period),
            IndicatorSpec::Mfi(period) => mfi::calculate_mfi(table.records(), *period),
        };
        Ok(values)
    }
}

/// Computes stockstats-named indicator columns on demand.
#[derive(Debug, Default, Clone, Copy)]
pub struct StockstatsEngine;

impl IndicatorEngine for StockstatsEngine {
    fn compute(&self, table: &mut PriceTable, name: &str) -> Result<(), TickstatsError> {
        if table.has_column(name) {
            return Ok(());
        }
        let spec: IndicatorSpec = name.parse()?;
        tracing::debug!(indicator = name, %spec, rows = table.len(), "computing indicator");
        let values = spec.evaluate(table)?;
        table.insert_column(name, values)
    }
}
