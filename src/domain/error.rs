//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for sigtrader.
#[derive(Debug, thiserror::Error)]
pub enum SigtraderError {
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

    #[error("data provider error: {reason}")]
    Data { reason: String },

    #[error("no price data for {ticker} since {start_date}")]
    NoData { ticker: String, start_date: NaiveDate },

    #[error("price series is empty")]
    EmptySeries,

    #[error("price series out of order at index {index}: {current} follows {previous}")]
    UnsortedSeries {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("price series contains duplicate date {date}")]
    DuplicateDate { date: NaiveDate },

    #[error("invalid bar on {date}: {field} = {value}")]
    InvalidBar {
        date: NaiveDate,
        field: &'static str,
        value: f64,
    },

    #[error("{what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("novelty store error: {reason}")]
    Store { reason: String },

    #[error("notification failed: {reason}")]
    Notify { reason: String },

    #[error("chart rendering failed: {reason}")]
    Chart { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SigtraderError {
    pub(crate) fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        SigtraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn config_missing(section: &str, key: &str) -> Self {
        SigtraderError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<&SigtraderError> for std::process::ExitCode {
    fn from(err: &SigtraderError) -> Self {
        let code: u8 = match err {
            SigtraderError::Io(_) => 1,
            SigtraderError::ConfigParse { .. }
            | SigtraderError::ConfigMissing { .. }
            | SigtraderError::ConfigInvalid { .. } => 2,
            SigtraderError::Data { .. } | SigtraderError::NoData { .. } => 3,
            SigtraderError::EmptySeries
            | SigtraderError::UnsortedSeries { .. }
            | SigtraderError::DuplicateDate { .. }
            | SigtraderError::InvalidBar { .. }
            | SigtraderError::LengthMismatch { .. } => 5,
            SigtraderError::Store { .. }
            | SigtraderError::Notify { .. }
            | SigtraderError::Chart { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
