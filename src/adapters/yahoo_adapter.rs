//! Yahoo Finance chart API adapter.
//!
//! Fetches daily bars from the v8 chart endpoint with a blocking client.
//! Prices are auto-adjusted: open/high/low are scaled by `adjclose / close`
//! and close is replaced by `adjclose`. Bar dates are taken in the exchange's
//! local time using the `gmtoffset` reported in the response metadata.
//! Requests have no timeout and block until the server answers. Failures
//! are returned as-is; there is no retry.

use crate::domain::error::TickstatsError;
use crate::domain::price_table::{PriceRecord, TradeDate};
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooAdapter {
    pub fn new() -> Result<Self, TickstatsError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, TickstatsError> {
        let client = reqwest::blocking::Client::builder()
            // The blocking client otherwise gives up after 30s
            .timeout(None::<Duration>)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| TickstatsError::RemoteFetch {
                symbol: String::new(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Chart URL for `[start, end)`.
    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        format!(
            "{}/v8/finance/chart/{symbol}?period1={start_ts}&period2={end_ts}\
             &interval=1d&includeAdjustedClose=true&events=div%2Csplits",
            self.base_url.trim_end_matches('/')
        )
    }

    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<PriceRecord>, TickstatsError> {
        let fail = |reason: String| TickstatsError::RemoteFetch {
            symbol: symbol.to_string(),
            reason,
        };

        let result = match resp.chart.result {
            Some(r) => r,
            None => {
                return Err(match resp.chart.error {
                    Some(err) if err.code == "Not Found" => {
                        fail(format!("symbol not found: {}", err.description))
                    }
                    Some(err) => fail(format!("{}: {}", err.code, err.description)),
                    None => fail("empty result with no error".into()),
                });
            }
        };

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| fail("result array is empty".into()))?;
        let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
        let timestamps = data.timestamp.unwrap_or_default();
        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| fail("no quote data".into()))?;
        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let mut records = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts + offset, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| fail(format!("invalid timestamp: {ts}")))?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            // Rows with no prices at all are placeholders for non-trading days
            if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
                continue;
            }

            let close = close.unwrap_or(f64::NAN);
            let adj = adj_closes
                .as_ref()
                .and_then(|v| v.get(i).copied().flatten())
                .unwrap_or(close);
            let ratio = if close != 0.0 { adj / close } else { 1.0 };

            records.push(PriceRecord {
                date: TradeDate::from_naive(date),
                open: open.unwrap_or(f64::NAN) * ratio,
                high: high.unwrap_or(f64::NAN) * ratio,
                low: low.unwrap_or(f64::NAN) * ratio,
                close: adj,
                adj_close: None,
                volume: volume.map(|v| v as f64).unwrap_or(0.0),
            });
        }

        // Intraday updates can repeat the last session's date
        records.dedup_by(|later, earlier| later.date == earlier.date);

        if records.is_empty() {
            return Err(fail("no price data returned".into()));
        }
        Ok(records)
    }
}

impl MarketDataPort for YahooAdapter {
    fn fetch_daily(
        &self,
        symbol: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<PriceRecord>, TickstatsError> {
        let fail = |reason: String| TickstatsError::RemoteFetch {
            symbol: symbol.to_string(),
            reason,
        };
        let start = crate::domain::date::parse_date(start)?;
        let end = crate::domain::date::parse_date(end)?;
        let url = self.chart_url(symbol, start, end);
        tracing::debug!(%url, "requesting chart data");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| fail(format!("request failed: {e}")))?;
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| fail(format!("failed to read response: {e}")))?;

        // Error payloads for unknown symbols arrive with a 404 status
        let chart: ChartResponse = match serde_json::from_str(&body) {
            Ok(c) => c,
            Err(_) if !status.is_success() => return Err(fail(format!("HTTP {status}"))),
            Err(e) => return Err(fail(format!("failed to parse response: {e}"))),
        };

        Self::parse_response(symbol, chart)
    }
}
