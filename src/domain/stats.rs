//! Indicator lookup for a symbol on a date: acquire, then resolve.

use crate::domain::acquisition::AcquisitionManager;
use crate::domain::error::TickstatsError;
use crate::domain::resolver::{IndicatorResolver, IndicatorValue};
use std::path::Path;

pub struct StockStats {
    acquisition: AcquisitionManager,
    resolver: IndicatorResolver,
}

impl StockStats {
    pub fn new(acquisition: AcquisitionManager, resolver: IndicatorResolver) -> Self {
        Self {
            acquisition,
            resolver,
        }
    }

    pub fn acquisition(&self) -> &AcquisitionManager {
        &self.acquisition
    }

    /// Value of `indicator` for `symbol` on `curr_date`, or
    /// [`IndicatorValue::NotTradingDay`] if the table has no such row.
    /// An online `curr_date` that does not parse is rejected before any
    /// fetch. Acquisition failures are returned unchanged.
    pub fn get_stock_stats(
        &self,
        symbol: &str,
        indicator: &str,
        curr_date: &str,
        data_dir: &Path,
        online: bool,
    ) -> Result<IndicatorValue, TickstatsError> {
        let key = AcquisitionManager::lookup_key(curr_date, online)?;
        let mut table = self.acquisition.acquire(symbol, data_dir, online)?;
        let value = self.resolver.resolve(&mut table, indicator, &key)?;
        tracing::debug!(symbol, indicator, curr_date = %key, %value, "resolved indicator");
        Ok(value)
    }
}
