#![allow(dead_code)]

use chrono::{Datelike, NaiveDate, Weekday};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tickstats::adapters::csv_adapter::CsvAdapter;
use tickstats::domain::acquisition::AcquisitionManager;
use tickstats::domain::error::TickstatsError;
use tickstats::domain::indicator::StockstatsEngine;
use tickstats::domain::price_table::{PriceRecord, TradeDate};
use tickstats::domain::resolver::IndicatorResolver;
use tickstats::domain::stats::StockStats;
use tickstats::ports::clock_port::Clock;
use tickstats::ports::market_data_port::MarketDataPort;

pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Provider that serves fixed rows and records every call.
pub struct MockProvider {
    pub rows: Vec<PriceRecord>,
    pub error: Option<String>,
    pub delay: Duration,
    pub calls: Arc<AtomicUsize>,
    pub requests: Arc<Mutex<Vec<(String, String, String)>>>,
}

impl MockProvider {
    pub fn new(rows: Vec<PriceRecord>) -> Self {
        Self {
            rows,
            error: None,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(reason: &str) -> Self {
        let mut p = Self::new(Vec::new());
        p.error = Some(reason.to_string());
        p
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl MarketDataPort for MockProvider {
    fn fetch_daily(
        &self,
        symbol: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<PriceRecord>, TickstatsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((symbol.to_string(), start.to_string(), end.to_string()));
        std::thread::sleep(self.delay);
        if let Some(reason) = &self.error {
            return Err(TickstatsError::RemoteFetch {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.rows.clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Weekday sessions from 2023-05-01 to 2023-06-30, skipping Memorial Day
/// and Juneteenth. Closes rise by one per session from 100.
pub fn aapl_rows() -> Vec<PriceRecord> {
    let holidays = [date(2023, 5, 29), date(2023, 6, 19)];
    let mut rows = Vec::new();
    let mut d = date(2023, 5, 1);
    while d <= date(2023, 6, 30) {
        let weekend = matches!(d.weekday(), Weekday::Sat | Weekday::Sun);
        if !weekend && !holidays.contains(&d) {
            let close = 100.0 + rows.len() as f64;
            rows.push(PriceRecord {
                date: TradeDate::from_naive(d),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                adj_close: Some(close - 0.25),
                volume: 1_000_000.0 + rows.len() as f64,
            });
        }
        d = d.succ_opt().unwrap();
    }
    rows
}

/// CSV text for `rows`, rendering each date with `render`.
pub fn rows_csv(rows: &[PriceRecord], render: impl Fn(&str) -> String) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    for r in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            render(r.date.as_str()),
            r.open,
            r.high,
            r.low,
            r.close,
            r.adj_close.unwrap_or(f64::NAN),
            r.volume
        ));
    }
    out
}

pub fn offline_path(data_dir: &Path, symbol: &str) -> PathBuf {
    data_dir.join(format!("{symbol}-YFin-data-2015-01-01-2025-03-25.csv"))
}

pub fn write_offline(data_dir: &Path, symbol: &str, csv: &str) -> PathBuf {
    let path = offline_path(data_dir, symbol);
    fs::write(&path, csv).unwrap();
    path
}

pub fn make_stats(cache_dir: &Path, provider: MockProvider, today: NaiveDate) -> StockStats {
    let acquisition = AcquisitionManager::new(
        cache_dir,
        Box::new(CsvAdapter),
        Box::new(provider),
        Box::new(FixedClock(today)),
    );
    StockStats::new(acquisition, IndicatorResolver::new(Box::new(StockstatsEngine)))
}

pub fn mean_close_ending_at(rows: &[PriceRecord], day: &str, n: usize) -> f64 {
    let idx = rows.iter().position(|r| r.date.as_str() == day).unwrap();
    let window = &rows[idx + 1 - n..=idx];
    window.iter().map(|r| r.close).sum::<f64>() / n as f64
}

pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
