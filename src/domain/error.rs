//! Domain error types.

/// Message surfaced verbatim when offline data has not been seeded.
pub const DATA_NOT_FETCHED: &str = "Stockstats fail: Yahoo Finance data not fetched yet!";

/// Top-level error type for tickstats.
#[derive(Debug, thiserror::Error)]
pub enum TickstatsError {
    /// Offline mode was requested and the pre-seeded file is missing.
    #[error("{message}")]
    DataUnavailable { message: String },

    #[error("remote fetch failed for {symbol}: {reason}")]
    RemoteFetch { symbol: String, reason: String },

    #[error("malformed data: {reason}")]
    MalformedData { reason: String },

    #[error("unknown indicator: {name}")]
    UnknownIndicator { name: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TickstatsError {
    pub fn data_unavailable() -> Self {
        TickstatsError::DataUnavailable {
            message: DATA_NOT_FETCHED.to_string(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        TickstatsError::MalformedData {
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for TickstatsError {
    fn from(err: csv::Error) -> Self {
        if !err.is_io_error() {
            return TickstatsError::malformed(format!("CSV error: {err}"));
        }
        match err.into_kind() {
            csv::ErrorKind::Io(io) => TickstatsError::Io(io),
            other => TickstatsError::malformed(format!("CSV error: {other:?}")),
        }
    }
}

impl From<&TickstatsError> for std::process::ExitCode {
    fn from(err: &TickstatsError) -> Self {
        let code: u8 = match err {
            TickstatsError::Io(_) => 1,
            TickstatsError::ConfigParse { .. } => 2,
            TickstatsError::DataUnavailable { .. } => 3,
            TickstatsError::RemoteFetch { .. } => 4,
            TickstatsError::MalformedData { .. } => 5,
            TickstatsError::UnknownIndicator { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_unavailable_displays_message_verbatim() {
        let err = TickstatsError::data_unavailable();
        assert_eq!(
            err.to_string(),
            "Stockstats fail: Yahoo Finance data not fetched yet!"
        );
    }

    #[test]
    fn remote_fetch_display() {
        let err = TickstatsError::RemoteFetch {
            symbol: "ZZZZ".into(),
            reason: "HTTP 404".into(),
        };
        assert_eq!(err.to_string(), "remote fetch failed for ZZZZ: HTTP 404");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: TickstatsError = io.into();
        assert!(matches!(err, TickstatsError::Io(_)));
    }
}
