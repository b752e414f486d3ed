//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for dcatrader.
#[derive(Debug, thiserror::Error)]
pub enum DcaError {
    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no price data for {symbol} between {start} and {end}")]
    NoData {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("insufficient data for {symbol}: have {bars} bars, need more than {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&DcaError> for std::process::ExitCode {
    fn from(err: &DcaError) -> Self {
        let code: u8 = match err {
            DcaError::Io(_) => 1,
            DcaError::ConfigParse { .. }
            | DcaError::ConfigMissing { .. }
            | DcaError::ConfigInvalid { .. } => 2,
            DcaError::DataSource { .. } => 3,
            DcaError::NoData { .. } | DcaError::InsufficientData { .. } => 5,
            DcaError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
