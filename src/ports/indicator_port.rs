//! Indicator computation port.

use crate::domain::error::TickstatsError;
use crate::domain::price_table::PriceTable;

pub trait IndicatorEngine: Send + Sync {
    /// Populate the derived column `name` on `table`.
    fn compute(&self, table: &mut PriceTable, name: &str) -> Result<(), TickstatsError>;
}
