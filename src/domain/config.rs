//! Typed view of the `[data]` configuration section.

use crate::ports::config_port::ConfigPort;
use std::path::PathBuf;

pub const DEFAULT_CACHE_DIR: &str = "./data_cache";
pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Clone, PartialEq)]
pub struct TickstatsConfig {
    /// Where online fetches are cached.
    pub data_cache_dir: PathBuf,
    /// Where pre-seeded offline files live.
    pub data_dir: PathBuf,
    /// Default acquisition mode when the caller does not choose one.
    pub online: bool,
}

impl Default for TickstatsConfig {
    fn default() -> Self {
        Self {
            data_cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            online: false,
        }
    }
}

impl TickstatsConfig {
    pub fn from_port(config: &dyn ConfigPort) -> Self {
        let defaults = Self::default();
        Self {
            data_cache_dir: config
                .get_string("data", "data_cache_dir")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_cache_dir),
            data_dir: config
                .get_string("data", "data_dir")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            online: config.get_bool("data", "online", defaults.online),
        }
    }
}
