//! CSV price file adapter.
//!
//! Reads price files written by the Yahoo downloader or by pandas
//! (`to_csv` with or without the index) and writes cache files with a fixed
//! header. Dates are canonicalized while reading, so a table loaded here is
//! ready for exact-date lookup.

use crate::domain::error::TickstatsError;
use crate::domain::price_table::{DateSource, PriceRecord, PriceTable, TradeDate};
use crate::ports::price_store_port::PriceStore;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

const DATE_HEADERS: &[&str] = &["date", "datetime", "timestamp"];

pub const WRITE_HEADER: [&str; 7] = ["Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"];

struct Layout {
    date_idx: usize,
    date_source: DateSource,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: usize,
    adj_close: Option<usize>,
    volume: Option<usize>,
}

impl Layout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, TickstatsError> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .collect();
        let find = |wanted: &str| names.iter().position(|n| n == wanted);

        let (date_idx, date_source) = match names
            .iter()
            .position(|n| DATE_HEADERS.contains(&n.as_str()))
        {
            Some(i) => (i, DateSource::Column(headers[i].trim().to_string())),
            None if names.first().is_some_and(|n| n.is_empty()) => (0, DateSource::Index),
            None => {
                return Err(TickstatsError::malformed(
                    "no date column or date index in price file",
                ));
            }
        };

        let close = find("close")
            .ok_or_else(|| TickstatsError::malformed("missing close column"))?;

        Ok(Self {
            date_idx,
            date_source,
            open: find("open"),
            high: find("high"),
            low: find("low"),
            close,
            adj_close: find("adj close").or_else(|| find("adj_close")),
            volume: find("volume"),
        })
    }
}

fn parse_number(record: &csv::StringRecord, idx: usize, field: &str) -> Result<f64, TickstatsError> {
    let cell = record.get(idx).unwrap_or("").trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    cell.parse().map_err(|e| {
        TickstatsError::malformed(format!("invalid {} value '{}': {}", field, cell, e))
    })
}

fn parse_optional(
    record: &csv::StringRecord,
    idx: Option<usize>,
    field: &str,
) -> Result<f64, TickstatsError> {
    match idx {
        Some(i) => parse_number(record, i, field),
        None => Ok(f64::NAN),
    }
}

/// Load a price file. A missing file surfaces as `Io` with `NotFound`.
pub fn read_price_table(path: &Path, symbol: &str) -> Result<PriceTable, TickstatsError> {
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let layout = Layout::from_headers(rdr.headers()?)?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let date_cell = record
            .get(layout.date_idx)
            .ok_or_else(|| TickstatsError::malformed("missing date cell"))?;

        records.push(PriceRecord {
            date: TradeDate::parse(date_cell)?,
            open: parse_optional(&record, layout.open, "open")?,
            high: parse_optional(&record, layout.high, "high")?,
            low: parse_optional(&record, layout.low, "low")?,
            close: parse_number(&record, layout.close, "close")?,
            adj_close: match layout.adj_close {
                Some(i) => Some(parse_number(&record, i, "adj close")?).filter(|v| !v.is_nan()),
                None => None,
            },
            volume: parse_optional(&record, layout.volume, "volume")?,
        });
    }

    tracing::debug!(path = %path.display(), rows = records.len(), "loaded price file");
    PriceTable::new(symbol, layout.date_source, records)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".tmp-{}", std::process::id()));
    path.with_file_name(name)
}

fn write_records(path: &Path, records: &[PriceRecord]) -> Result<(), TickstatsError> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(WRITE_HEADER)?;
    for r in records {
        let adj = r.adj_close.map(|v| v.to_string()).unwrap_or_default();
        wtr.write_record([
            r.date.to_string(),
            r.open.to_string(),
            r.high.to_string(),
            r.low.to_string(),
            r.close.to_string(),
            adj,
            r.volume.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `table` under `path`, replacing it atomically. The temporary
/// sibling is removed if the write or the rename fails.
pub fn write_price_table(path: &Path, table: &PriceTable) -> Result<(), TickstatsError> {
    let tmp = temp_sibling(path);
    let written = write_records(&tmp, table.records())
        .and_then(|()| fs::rename(&tmp, path).map_err(TickstatsError::from));
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    tracing::debug!(path = %path.display(), rows = table.len(), "wrote price file");
    Ok(())
}

/// [`PriceStore`] backed by CSV files.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvAdapter;

impl PriceStore for CsvAdapter {
    fn load(&self, path: &Path, symbol: &str) -> Result<PriceTable, TickstatsError> {
        read_price_table(path, symbol)
    }

    fn save(&self, path: &Path, table: &PriceTable) -> Result<(), TickstatsError> {
        write_price_table(path, table)
    }
}
