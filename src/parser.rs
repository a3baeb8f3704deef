//! Extraction of (oracle calls, best score) pairs from optimiser terminal
//! output.
//!
//! A record is two consecutive lines:
//!
//! ```text
//! Best logp Score: 2.5
//! Total Number of Oracle Calls (Function Evaluations): 10
//! ```
//!
//! Everything else in the log is ignored. Whitespace inside the markers and
//! around the colon may vary; the value is the rest of the line with
//! surrounding whitespace removed, so trailing text is a parse error.

use std::fs;
use std::io;
use std::path::Path;

use regex::Regex;
use tracing::{debug, error, info};

use crate::error::{ProgressError, Result, ValueKind};
use crate::progress::ProgressMap;

/// Oracle call marker exactly as the optimiser prints it.
pub const ORACLE_MARKER: &str = "Total Number of Oracle Calls (Function Evaluations): ";

/// Score marker for `task_label` exactly as the optimiser prints it.
pub fn score_marker(task_label: &str) -> String {
    format!("Best {task_label} Score: ")
}

#[derive(Debug, Clone)]
pub struct LogParser {
    task_label: String,
    score_re: Regex,
    oracle_re: Regex,
}

impl LogParser {
    pub fn new(task_label: &str) -> Result<Self> {
        let label = task_label.trim();
        if label.is_empty() {
            return Err(ProgressError::Config("task label must not be empty".into()));
        }
        let label_pattern = label
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");
        let score_re = Regex::new(&format!(r"Best\s+{label_pattern}\s+Score\s*:(.*)$"))
            .map_err(|e| ProgressError::Config(e.to_string()))?;
        let oracle_re = Regex::new(
            r"Total\s+Number\s+of\s+Oracle\s+Calls\s*\(\s*Function\s+Evaluations\s*\)\s*:(.*)$",
        )
        .map_err(|e| ProgressError::Config(e.to_string()))?;
        Ok(Self {
            task_label: label.to_string(),
            score_re,
            oracle_re,
        })
    }

    pub fn task_label(&self) -> &str {
        &self.task_label
    }

    /// Read the whole file and parse it.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ProgressMap> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                error!(path = %path.display(), "log file not found");
                ProgressError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ProgressError::Io(e)
            }
        })?;
        let map = self.parse_str(&text)?;
        info!(
            path = %path.display(),
            task = %self.task_label,
            records = map.len(),
            "parsed optimisation log"
        );
        Ok(map)
    }

    pub fn parse_str(&self, text: &str) -> Result<ProgressMap> {
        self.parse_lines(text.lines())
    }

    /// Scan lines in order. Fails on the first malformed record; there is
    /// no partial result.
    pub fn parse_lines<'a, I>(&self, lines: I) -> Result<ProgressMap>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let lines: Vec<&str> = lines.into_iter().collect();
        let mut map = ProgressMap::new();
        let mut idx = 0;
        while idx < lines.len() {
            let Some(score_text) = capture(&self.score_re, lines[idx]) else {
                idx += 1;
                continue;
            };
            let score_line = idx + 1;
            let score: f64 = parse_value(score_text, score_line, ValueKind::Score)?;

            let oracle_line = score_line + 1;
            let next = lines
                .get(idx + 1)
                .ok_or(ProgressError::TruncatedRecord { line: score_line })?;
            let calls_text = capture(&self.oracle_re, next)
                .ok_or(ProgressError::MissingOracleLine { line: oracle_line })?;
            let calls: u64 = parse_value(calls_text, oracle_line, ValueKind::OracleCalls)?;
            if calls == 0 {
                return Err(ProgressError::Parse {
                    line: oracle_line,
                    text: calls_text.to_string(),
                    kind: ValueKind::OracleCalls,
                });
            }

            debug!(line = score_line, calls, score, "record");
            map.insert(calls, score);
            // the oracle line belongs to this record
            idx += 2;
        }
        Ok(map)
    }
}

/// Parse the log at `path` for `task_label`.
pub fn parse_file(path: impl AsRef<Path>, task_label: &str) -> Result<ProgressMap> {
    LogParser::new(task_label)?.parse_file(path)
}

fn capture<'t>(re: &Regex, line: &'t str) -> Option<&'t str> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn parse_value<T: std::str::FromStr>(text: &str, line: usize, kind: ValueKind) -> Result<T> {
    text.parse().map_err(|_| ProgressError::Parse {
        line,
        text: text.to_string(),
        kind,
    })
}
