//! Domain error types.

use chrono::NaiveDate;

/// Failures of the historical replay check. All of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("unexpected historical data count: expected {expected} dated batches, got {actual}")]
    UnexpectedCount { expected: usize, actual: usize },

    #[error("unexpected historical universe data: no records on {date}")]
    EmptyBatch { date: NaiveDate },

    #[error("unexpected historical universe data: nothing selected on {date}")]
    EmptySelection { date: NaiveDate },
}

/// Top-level error type for insider-screen.
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("malformed universe data in {file} line {line}, column {column}: {reason}")]
    DataParse {
        file: String,
        line: u64,
        column: String,
        reason: String,
    },

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

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("no universe data between {start} and {end}")]
    NoData { start: NaiveDate, end: NaiveDate },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScreenError {
    /// Process exit status for this error.
    pub fn exit_status(&self) -> u8 {
        match self {
            ScreenError::Io(_) => 1,
            ScreenError::ConfigParse { .. }
            | ScreenError::ConfigMissing { .. }
            | ScreenError::ConfigInvalid { .. } => 2,
            ScreenError::DataSource { .. } | ScreenError::DataParse { .. } => 3,
            ScreenError::History(_) => 4,
            ScreenError::NoData { .. } => 5,
        }
    }
}

impl From<&ScreenError> for std::process::ExitCode {
    fn from(err: &ScreenError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
