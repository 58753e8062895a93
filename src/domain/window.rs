//! Date windows that identify a stored price file.

use crate::domain::date;
use chrono::{Datelike, NaiveDate};

/// Fixed window of the pre-seeded offline files.
pub const OFFLINE_START: &str = "2015-01-01";
pub const OFFLINE_END: &str = "2025-03-25";

/// Years of history requested when fetching online.
pub const ONLINE_LOOKBACK_YEARS: i32 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheWindow {
    pub start: String,
    pub end: String,
}

impl CacheWindow {
    pub fn offline() -> Self {
        Self {
            start: OFFLINE_START.to_string(),
            end: OFFLINE_END.to_string(),
        }
    }

    /// `end = today`, `start = today - years`. Feb 29 falls back to Feb 28
    /// when the start year is not a leap year.
    pub fn trailing_years(today: NaiveDate, years: i32) -> Self {
        let year = today.year() - years;
        let start = NaiveDate::from_ymd_opt(year, today.month(), today.day())
            .or_else(|| NaiveDate::from_ymd_opt(year, today.month(), today.day() - 1))
            .unwrap_or(today);
        Self {
            start: date::from_naive(start),
            end: date::from_naive(today),
        }
    }

    /// `{symbol}-YFin-data-{start}-{end}.csv`
    pub fn file_name(&self, symbol: &str) -> String {
        format!("{}-YFin-data-{}-{}.csv", symbol, self.start, self.end)
    }
}
