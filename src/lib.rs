//! Progress analysis for black-box optimisation runs.
//!
//! Terminal output of an optimiser is scanned for pairs of lines carrying the
//! running best score and the cumulative number of oracle calls. The pairs
//! are expanded into a "best so far" staircase and drawn as a progress chart.

pub mod config;
pub mod error;
pub mod export;
pub mod io_utils;
pub mod logging;
pub mod parser;
pub mod progress;
pub mod render;
pub mod stats;

pub use config::{BatchConfig, JobConfig, PlotOptions};
pub use error::{ProgressError, Result, ValueKind};
pub use parser::{parse_file, score_marker, LogParser, ORACLE_MARKER};
pub use progress::{expand, ExpandedSeries, ProgressMap, ProgressPoint};
pub use render::{render, ChartData, ChartFormat, PlottersSink, RenderSink, TerminalSink};
pub use stats::{standard_error, RunSummary};

/// Parse one log and render it according to `opts`.
pub fn plot_log(
    path: impl AsRef<std::path::Path>,
    task_label: &str,
    best_in_set: Option<f64>,
    opts: &PlotOptions,
) -> Result<ChartData> {
    let map = parse_file(path, task_label)?;
    let data = ChartData::from_map(&map, best_in_set)?;
    render(&data, opts)?;
    Ok(data)
}
