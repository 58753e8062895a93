//! Acquisition of a canonical price table, from pre-seeded files (offline)
//! or from a per-day on-disk cache in front of the remote provider (online).
//!
//! Online cache files are keyed by `(symbol, today - 15y, today)`, so an
//! entry is only reused by requests made on the same calendar day. Entries
//! are never rewritten in place; a new day produces a new file.
//!
//! Concurrent first-time requests for one key are serialized on a lock keyed
//! by the cache path. The file is checked again once the lock is held, so a
//! single remote fetch serves all waiters. A lock is dropped from the map by
//! the last holder. Fetched rows are validated as a table before anything is
//! written, so a cache file always loads.

use crate::domain::date;
use crate::domain::error::TickstatsError;
use crate::domain::price_table::{DateSource, PriceTable};
use crate::domain::window::{CacheWindow, ONLINE_LOOKBACK_YEARS};
use crate::ports::clock_port::Clock;
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::price_store_port::PriceStore;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct KeyedLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    fn lock_for(&self, key: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(key.to_path_buf()).or_default())
    }

    /// Give back a lock from [`lock_for`](Self::lock_for), removing its
    /// entry when no other caller holds or waits on it.
    fn release(&self, key: &Path, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if Arc::strong_count(&lock) == 2 {
            locks.remove(key);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

pub struct AcquisitionManager {
    cache_dir: PathBuf,
    store: Box<dyn PriceStore>,
    provider: Box<dyn MarketDataPort>,
    clock: Box<dyn Clock>,
    locks: KeyedLocks,
}

impl AcquisitionManager {
    pub fn new(
        cache_dir: impl Into<PathBuf>,
        store: Box<dyn PriceStore>,
        provider: Box<dyn MarketDataPort>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            store,
            provider,
            clock,
            locks: KeyedLocks::default(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Window used by an online request made now.
    pub fn online_window(&self) -> CacheWindow {
        CacheWindow::trailing_years(self.clock.today(), ONLINE_LOOKBACK_YEARS)
    }

    /// Cache file an online request for `symbol` would use today.
    pub fn cache_path(&self, symbol: &str) -> PathBuf {
        self.cache_dir.join(self.online_window().file_name(symbol))
    }

    pub fn acquire(
        &self,
        symbol: &str,
        data_dir: &Path,
        online: bool,
    ) -> Result<PriceTable, TickstatsError> {
        if online {
            self.acquire_online(symbol)
        } else {
            self.acquire_offline(symbol, data_dir)
        }
    }

    fn acquire_offline(&self, symbol: &str, data_dir: &Path) -> Result<PriceTable, TickstatsError> {
        let path = data_dir.join(CacheWindow::offline().file_name(symbol));
        tracing::debug!(path = %path.display(), "reading offline price file");
        match self.store.load(&path, symbol) {
            Err(TickstatsError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                Err(TickstatsError::data_unavailable())
            }
            other => other,
        }
    }

    fn acquire_online(&self, symbol: &str) -> Result<PriceTable, TickstatsError> {
        let window = self.online_window();
        fs::create_dir_all(&self.cache_dir)?;
        let path = self.cache_dir.join(window.file_name(symbol));

        if path.exists() {
            tracing::debug!(path = %path.display(), "cache hit");
            return self.store.load(&path, symbol);
        }

        let lock = self.locks.lock_for(&path);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.fill_locked(symbol, &path, &window)
        };
        self.locks.release(&path, lock);
        result
    }

    /// Load `path`, fetching and caching it first if it is still missing.
    /// Must be called with the key lock for `path` held.
    fn fill_locked(
        &self,
        symbol: &str,
        path: &Path,
        window: &CacheWindow,
    ) -> Result<PriceTable, TickstatsError> {
        if path.exists() {
            tracing::debug!(path = %path.display(), "cache filled while waiting");
            return self.store.load(path, symbol);
        }

        tracing::info!(
            symbol,
            start = %window.start,
            end = %window.end,
            "fetching remote price data"
        );
        let records = self.provider.fetch_daily(symbol, &window.start, &window.end)?;
        let table = PriceTable::new(symbol, DateSource::Column("Date".into()), records)?;
        self.store.save(path, &table)?;
        tracing::info!(path = %path.display(), rows = table.len(), "cached price data");
        Ok(table)
    }

    /// Date string to match against the table. Online requests canonicalize
    /// the caller's date; offline requests match it as given.
    pub fn lookup_key(curr_date: &str, online: bool) -> Result<String, TickstatsError> {
        if online {
            date::canonicalize(curr_date)
        } else {
            Ok(curr_date.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::csv_adapter::CsvAdapter;
    use crate::domain::price_table::{PriceRecord, TradeDate};
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct FixedClock(NaiveDate);

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            self.0
        }
    }

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        rows: Vec<PriceRecord>,
    }

    impl MarketDataPort for CountingProvider {
        fn fetch_daily(
            &self,
            _symbol: &str,
            _start: &str,
            _end: &str,
        ) -> Result<Vec<PriceRecord>, TickstatsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows.clone())
        }
    }

    fn bar(day: &str) -> PriceRecord {
        PriceRecord {
            date: TradeDate::parse(day).unwrap(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            adj_close: None,
            volume: 10.0,
        }
    }

    fn manager_with(
        cache: &TempDir,
        rows: Vec<PriceRecord>,
    ) -> (AcquisitionManager, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let m = AcquisitionManager::new(
            cache.path().join("cache"),
            Box::new(CsvAdapter),
            Box::new(CountingProvider {
                calls: Arc::clone(&calls),
                rows,
            }),
            Box::new(FixedClock(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())),
        );
        (m, calls)
    }

    fn manager(cache: &TempDir) -> (AcquisitionManager, Arc<AtomicUsize>) {
        manager_with(cache, vec![bar("2026-10-16")])
    }

    #[test]
    fn offline_missing_file_is_data_unavailable() {
        let dir = TempDir::new().unwrap();
        let (m, calls) = manager(&dir);
        let err = m.acquire("AAPL", dir.path(), false).unwrap_err();
        assert!(matches!(err, TickstatsError::DataUnavailable { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn online_creates_cache_dir_and_file() {
        let dir = TempDir::new().unwrap();
        let (m, calls) = manager(&dir);
        let table = m.acquire("AAPL", dir.path(), true).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            m.cache_path("AAPL"),
            dir.path()
                .join("cache")
                .join("AAPL-YFin-data-2011-10-19-2026-10-19.csv")
        );
        assert!(m.cache_path("AAPL").exists());
    }

    #[test]
    fn fetched_rows_with_repeated_date_are_not_cached() {
        let dir = TempDir::new().unwrap();
        let rows = vec![bar("2026-10-15"), bar("2026-10-16"), bar("2026-10-15")];
        let (m, calls) = manager_with(&dir, rows);

        for _ in 0..2 {
            let err = m.acquire("AAPL", dir.path(), true).unwrap_err();
            assert!(matches!(err, TickstatsError::MalformedData { .. }));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!m.cache_path("AAPL").exists());
        assert_eq!(fs::read_dir(m.cache_dir()).unwrap().count(), 0);
    }

    #[test]
    fn fetched_table_matches_cached_file() {
        let dir = TempDir::new().unwrap();
        let (m, _) = manager_with(&dir, vec![bar("2026-10-16"), bar("2026-10-15")]);
        let fetched = m.acquire("AAPL", dir.path(), true).unwrap();
        let cached = m.acquire("AAPL", dir.path(), true).unwrap();

        assert_eq!(fetched.records(), cached.records());
        assert_eq!(fetched.date_source(), cached.date_source());
        assert_eq!(fetched.records()[0].date.as_str(), "2026-10-15");
    }

    #[test]
    fn key_locks_are_released_after_use() {
        let dir = TempDir::new().unwrap();
        let (m, _) = manager(&dir);
        m.acquire("AAPL", dir.path(), true).unwrap();
        m.acquire("MSFT", dir.path(), true).unwrap();
        assert_eq!(m.locks.len(), 0);

        let (failing, _) = manager_with(&dir, vec![bar("2026-10-16"), bar("2026-10-16")]);
        assert!(failing.acquire("IBM", dir.path(), true).is_err());
        assert_eq!(failing.locks.len(), 0);
    }

    #[test]
    fn key_lock_kept_while_another_caller_holds_it() {
        let locks = KeyedLocks::default();
        let key = Path::new("/cache/AAPL.csv");
        let first = locks.lock_for(key);
        let second = locks.lock_for(key);
        assert!(Arc::ptr_eq(&first, &second));

        locks.release(key, first);
        assert_eq!(locks.len(), 1);
        locks.release(key, second);
        assert_eq!(locks.len(), 0);
    }

    #[test]
    fn lookup_key_online_canonicalizes() {
        assert_eq!(
            AcquisitionManager::lookup_key("2023-6-15", true).unwrap(),
            "2023-06-15"
        );
        assert!(AcquisitionManager::lookup_key("soon", true).is_err());
    }

    #[test]
    fn lookup_key_offline_is_verbatim() {
        assert_eq!(
            AcquisitionManager::lookup_key("2023-6-15", false).unwrap(),
            "2023-6-15"
        );
    }
}
