use std::path::PathBuf;

use thiserror::Error;

/// What kind of value failed to parse after a log marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Score,
    OracleCalls,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::Score => f.write_str("best score"),
            ValueKind::OracleCalls => f.write_str("oracle call count"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ProgressError {
    /// The log file does not exist.
    #[error("log file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// A score line was the last line of the log.
    #[error("truncated record: score on line {line} has no oracle call line after it")]
    TruncatedRecord { line: usize },

    /// The line after a score line does not carry the oracle call marker.
    #[error("line {line} does not contain the oracle call marker")]
    MissingOracleLine { line: usize },

    /// Text after a marker is not a valid number.
    #[error("invalid {kind} on line {line}: {text:?}")]
    Parse {
        line: usize,
        text: String,
        kind: ValueKind,
    },

    /// Points handed to the expander are malformed.
    #[error("invalid progress point: {0}")]
    InvalidPoint(String),

    /// Configuration file or option error.
    #[error("config error: {0}")]
    Config(String),

    /// Plotting backend failure.
    #[error("render error: {0}")]
    Render(String),

    /// CSV or JSON export failure.
    #[error("export error: {0}")]
    Export(String),

    /// Propagated I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for ProgressError {
    fn from(err: csv::Error) -> Self {
        ProgressError::Export(err.to_string())
    }
}

impl From<serde_json::Error> for ProgressError {
    fn from(err: serde_json::Error) -> Self {
        ProgressError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProgressError>;
