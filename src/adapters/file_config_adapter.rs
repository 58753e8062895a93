//! INI file configuration adapter.
//!
//! Keys are looked up case-insensitively. Booleans accept the usual INI
//! spellings (`true`/`false`, `yes`/`no`, `on`/`off`, `1`/`0`); anything else
//! falls back to the caller's default.

use crate::domain::error::TickstatsError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file(path: &Path) -> Result<Self, TickstatsError> {
        let mut config = Ini::new();
        config.load(path).map_err(|reason| TickstatsError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, TickstatsError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| TickstatsError::ConfigParse {
                file: "<inline>".into(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        match self.config.getboolcoerce(section, key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(reason) => {
                tracing::warn!(section, key, %reason, "ignoring unreadable boolean");
                default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_data_section() {
        let content = r#"
[data]
data_cache_dir = /var/cache/tickstats
data_dir = /srv/prices
online = yes
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("data", "data_cache_dir"),
            Some("/var/cache/tickstats".to_string())
        );
        assert_eq!(
            adapter.get_string("data", "data_dir"),
            Some("/srv/prices".to_string())
        );
        assert!(adapter.get_bool("data", "online", false));
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[data]\ndata_dir = x\n").unwrap();
        assert_eq!(adapter.get_string("data", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_bool_returns_false_values() {
        let adapter =
            FileConfigAdapter::from_string("[data]\na = false\nb = no\nc = 0\n").unwrap();
        assert!(!adapter.get_bool("data", "a", true));
        assert!(!adapter.get_bool("data", "b", true));
        assert!(!adapter.get_bool("data", "c", true));
    }

    #[test]
    fn get_bool_returns_default_for_missing_or_garbage() {
        let adapter = FileConfigAdapter::from_string("[data]\nonline = maybe\n").unwrap();
        assert!(adapter.get_bool("data", "online", true));
        assert!(!adapter.get_bool("data", "missing", false));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[data]\ndata_cache_dir = /tmp/cache\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("data", "data_cache_dir"),
            Some("/tmp/cache".to_string())
        );
    }

    #[test]
    fn from_file_missing_is_config_error_naming_the_file() {
        let path = Path::new("/nonexistent/path/config.ini");
        match FileConfigAdapter::from_file(path) {
            Err(TickstatsError::ConfigParse { file, .. }) => {
                assert_eq!(file, "/nonexistent/path/config.ini")
            }
            Err(other) => panic!("expected ConfigParse, got {other:?}"),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn empty_value_reads_as_unset() {
        let adapter = FileConfigAdapter::from_string("[data]\ndata_dir =\n").unwrap();
        assert_eq!(adapter.get_string("data", "data_dir"), None);
    }

    #[test]
    fn keys_and_bool_spellings_are_case_insensitive() {
        let adapter =
            FileConfigAdapter::from_string("[DATA]\nOnline = ON\nData_Dir =  /srv/x  \n").unwrap();
        assert!(adapter.get_bool("data", "online", false));
        assert_eq!(adapter.get_string("data", "data_dir"), Some("/srv/x".into()));
    }
}
