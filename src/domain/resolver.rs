//! Resolves an indicator value for one exact date.

use crate::domain::error::TickstatsError;
use crate::domain::price_table::PriceTable;
use crate::ports::indicator_port::IndicatorEngine;
use std::fmt;

/// Returned in place of a number when the table has no row for the date.
pub const NOT_TRADING_DAY: &str = "N/A: Not a trading day (weekend or holiday)";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorValue {
    Number(f64),
    /// No record for the requested date (weekend, holiday or out of range).
    NotTradingDay,
}

impl IndicatorValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            IndicatorValue::Number(v) => Some(*v),
            IndicatorValue::NotTradingDay => None,
        }
    }
}

impl fmt::Display for IndicatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorValue::Number(v) => write!(f, "{v}"),
            IndicatorValue::NotTradingDay => f.write_str(NOT_TRADING_DAY),
        }
    }
}

pub struct IndicatorResolver {
    engine: Box<dyn IndicatorEngine>,
}

impl IndicatorResolver {
    pub fn new(engine: Box<dyn IndicatorEngine>) -> Self {
        Self { engine }
    }

    /// Compute `indicator` on `table` and return its value on `curr_date`.
    /// Dates are compared for exact equality; a partial date never matches.
    pub fn resolve(
        &self,
        table: &mut PriceTable,
        indicator: &str,
        curr_date: &str,
    ) -> Result<IndicatorValue, TickstatsError> {
        self.engine.compute(table, indicator)?;

        let Some(row) = table.position(curr_date) else {
            tracing::debug!(symbol = table.symbol(), curr_date, "no row for date");
            return Ok(IndicatorValue::NotTradingDay);
        };

        let value = table.derived_value(indicator, row).ok_or_else(|| {
            TickstatsError::malformed(format!("indicator column {indicator} was not populated"))
        })?;
        Ok(IndicatorValue::Number(value))
    }
}
