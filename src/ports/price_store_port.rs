//! Local price file storage port.

use crate::domain::error::TickstatsError;
use crate::domain::price_table::PriceTable;
use std::path::Path;

pub trait PriceStore: Send + Sync {
    /// Load the table stored at `path`. A missing file must surface as
    /// `TickstatsError::Io` with `ErrorKind::NotFound`.
    fn load(&self, path: &Path, symbol: &str) -> Result<PriceTable, TickstatsError>;

    /// Persist `table` at `path`, replacing any existing file atomically.
    /// Nothing is left at `path` or beside it when saving fails.
    fn save(&self, path: &Path, table: &PriceTable) -> Result<(), TickstatsError>;
}
