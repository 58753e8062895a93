//! Daily price table for one symbol.
//!
//! Dates are held as [`TradeDate`], a canonical `YYYY-MM-DD` string that can
//! only be built by parsing. Base price fields and derived indicator columns
//! are both reachable through [`PriceTable::column`].

use crate::domain::date;
use crate::domain::error::TickstatsError;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

/// Canonical calendar date of a price record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradeDate(String);

impl TradeDate {
    pub fn parse(raw: &str) -> Result<Self, TickstatsError> {
        date::canonicalize(raw).map(TradeDate)
    }

    pub fn from_naive(d: NaiveDate) -> Self {
        TradeDate(date::from_naive(d))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TradeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a loaded table found its dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSource {
    /// A named column such as `Date`.
    Column(String),
    /// An unnamed leading index column (a frame saved with its index).
    Index,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub date: TradeDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: Option<f64>,
    pub volume: f64,
}

impl PriceRecord {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

#[derive(Debug, Clone)]
pub struct PriceTable {
    symbol: String,
    date_source: DateSource,
    records: Vec<PriceRecord>,
    derived: BTreeMap<String, Vec<f64>>,
}

impl PriceTable {
    /// Build a table, sorting by date. Duplicate dates are rejected.
    pub fn new(
        symbol: impl Into<String>,
        date_source: DateSource,
        mut records: Vec<PriceRecord>,
    ) -> Result<Self, TickstatsError> {
        records.sort_by(|a, b| a.date.cmp(&b.date));
        if let Some(dup) = records.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(TickstatsError::malformed(format!(
                "duplicate date {} in price table",
                dup[0].date
            )));
        }
        Ok(Self {
            symbol: symbol.into(),
            date_source,
            records,
            derived: BTreeMap::new(),
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn date_source(&self) -> &DateSource {
        &self.date_source
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = &TradeDate> {
        self.records.iter().map(|r| &r.date)
    }

    /// Values of a base field (`open`, `high`, `low`, `close`, `adj close`,
    /// `volume`) or of a previously inserted derived column. Base field names
    /// are matched case-insensitively.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        if let Some(values) = self.derived.get(name) {
            return Some(values.clone());
        }
        let pick: fn(&PriceRecord) -> f64 = match name.to_ascii_lowercase().as_str() {
            "open" => |r| r.open,
            "high" => |r| r.high,
            "low" => |r| r.low,
            "close" => |r| r.close,
            "adj close" | "adj_close" => |r| r.adj_close.unwrap_or(f64::NAN),
            "volume" => |r| r.volume,
            _ => return None,
        };
        Some(self.records.iter().map(pick).collect())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.derived.contains_key(name)
    }

    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), TickstatsError> {
        let name = name.into();
        if values.len() != self.records.len() {
            return Err(TickstatsError::malformed(format!(
                "column {} has {} values, table has {} rows",
                name,
                values.len(),
                self.records.len()
            )));
        }
        self.derived.insert(name, values);
        Ok(())
    }

    /// Value of a derived column at a row.
    pub fn derived_value(&self, name: &str, row: usize) -> Option<f64> {
        self.derived.get(name).and_then(|v| v.get(row)).copied()
    }

    /// Row index of the first record whose date equals `date` exactly.
    pub fn position(&self, date: &str) -> Option<usize> {
        self.records.iter().position(|r| r.date.as_str() == date)
    }
}
