use std::fmt;
use std::io;
use std::path::Path;

use crate::error::ProgressError;

#[derive(Debug)]
pub struct CliError {
    pub msg: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.msg.fmt(f)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Format a user friendly I/O error message with suggestions.
///
/// Operations starting with `reading` refer to an optimiser log; anything
/// else is treated as a chart, CSV or JSON output.
pub fn format_io_error(operation: &str, path: &Path, err: &io::Error) -> String {
    use io::ErrorKind::*;
    let reading = operation.starts_with("reading");
    let suggestion = match (err.kind(), reading) {
        (NotFound, true) => "Check that the log file exists and the path is correct.",
        (NotFound, false) => "Check that the output directory exists.",
        (PermissionDenied, true) => "Check permissions on the log file.",
        (PermissionDenied, false) => "Check permissions on the output directory.",
        (InvalidData, _) => "The log is not valid UTF-8 text.",
        (WriteZero, _) => "Disk may be full. Free up space and try again.",
        (_, true) => "Check that the log file is readable.",
        (_, false) => "Check that the output path is writable and the disk has free space.",
    };
    format!(
        "Error {} '{}': {}. {}",
        operation,
        path.display(),
        err,
        suggestion
    )
}

/// Convert an I/O error into a CLI error with context.
pub fn io_cli_error(operation: &str, path: &Path, err: io::Error) -> CliError {
    CliError {
        msg: format_io_error(operation, path, &err),
        source: Some(Box::new(err)),
    }
}

/// Simple CLI error from string.
pub fn simple_cli_error(msg: &str) -> CliError {
    CliError {
        msg: msg.to_string(),
        source: None,
    }
}

/// Convert a library error into a CLI error with a hint.
pub fn progress_cli_error(context: &str, err: ProgressError) -> CliError {
    CliError {
        msg: format!("{}: {}", context, cli_hint(&err)),
        source: Some(Box::new(err)),
    }
}

/// Return an actionable hint for an error variant.
pub fn cli_hint(err: &ProgressError) -> String {
    use ProgressError::*;
    match err {
        FileNotFound { path } => format!(
            "File Not Found! '{}'. Check that the log exists and the path is correct.",
            path.display()
        ),
        TruncatedRecord { .. } => format!("{err}. The log may have been cut off mid-run."),
        MissingOracleLine { .. } => {
            format!("{err}. Score lines must be followed directly by the oracle call total.")
        }
        Parse { .. } => format!("{err}. Check the task label and the log contents."),
        InvalidPoint(_) => format!("{err}. Oracle call counts must be positive."),
        Config(_) => format!("{err}. Fix the configuration and retry."),
        Render(_) => format!("{err}. Try an .svg output or check installed fonts."),
        Export(_) => format!("{err}. Check the output location."),
        Io(io) => format!("{io}"),
    }
}
