//! Canonical `YYYY-MM-DD` date handling.
//!
//! Every date that enters a [`PriceTable`](crate::domain::price_table::PriceTable)
//! passes through [`canonicalize`], whatever shape the source wrote it in:
//! plain dates, pandas timestamps with or without a UTC offset, RFC 3339,
//! slash-separated or compact forms. Offset-bearing timestamps keep the date
//! as written rather than the UTC-converted date.

use crate::domain::error::TickstatsError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parse a date in any supported representation.
pub fn parse_date(raw: &str) -> Result<NaiveDate, TickstatsError> {
    let s = raw.trim();

    // `%Y` is greedy when parsing, so compact dates are split by hand.
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        let dashed = format!("{}-{}-{}", &s[..4], &s[4..6], &s[6..]);
        if let Ok(d) = NaiveDate::parse_from_str(&dashed, "%Y-%m-%d") {
            return Ok(d);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.date_naive());
        }
    }

    Err(TickstatsError::malformed(format!("unparseable date '{raw}'")))
}

/// Parse then reformat as `YYYY-MM-DD`.
pub fn canonicalize(raw: &str) -> Result<String, TickstatsError> {
    parse_date(raw).map(from_naive)
}

pub fn from_naive(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}
