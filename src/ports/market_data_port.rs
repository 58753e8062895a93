//! Remote market data port.

use crate::domain::error::TickstatsError;
use crate::domain::price_table::PriceRecord;

pub trait MarketDataPort: Send + Sync {
    /// Daily rows for `symbol` from `start` (inclusive) to `end` (exclusive),
    /// both `YYYY-MM-DD`.
    fn fetch_daily(
        &self,
        symbol: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<PriceRecord>, TickstatsError>;
}
