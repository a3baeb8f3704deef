use std::io::Write;

use super::{ChartData, RenderSink};
use crate::config::PlotOptions;
use crate::error::Result;

/// Text rendition of the staircase: one row per sampled call index with a
/// bar scaled between the lowest and highest value shown.
pub struct TerminalSink<W: Write> {
    out: W,
    rows: usize,
    width: usize,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            rows: 20,
            width: 50,
        }
    }

    pub fn with_size(mut self, rows: usize, width: usize) -> Self {
        self.rows = rows.max(1);
        self.width = width.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Evenly spaced indices into a series of `len` values, always including
/// the last one.
fn sample_indices(len: usize, rows: usize) -> Vec<usize> {
    if len <= rows {
        return (0..len).collect();
    }
    if rows == 1 {
        return vec![len - 1];
    }
    let mut idx: Vec<usize> = (0..rows).map(|r| r * (len - 1) / (rows - 1)).collect();
    idx.dedup();
    idx
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn render(&mut self, data: &ChartData, opts: &PlotOptions) -> Result<()> {
        if !opts.title.is_empty() {
            writeln!(self.out, "{}", opts.title)?;
        }
        let Some(series) = data.expanded.as_ref().filter(|s| !s.is_empty()) else {
            writeln!(self.out, "(no progress records)")?;
            return Ok(());
        };

        let rows = sample_indices(series.len(), self.rows);
        let lo = rows
            .iter()
            .map(|&i| series.scores[i])
            .fold(f64::INFINITY, f64::min)
            .min(0.0);
        let hi = rows
            .iter()
            .map(|&i| series.scores[i])
            .fold(f64::NEG_INFINITY, f64::max);

        writeln!(self.out, "{:>8} | {:>12} |", "calls", "best score")?;
        for i in rows {
            let score = series.scores[i];
            let bar = if hi > lo && score.is_finite() {
                (((score - lo) / (hi - lo)) * self.width as f64).round() as usize
            } else {
                0
            };
            writeln!(
                self.out,
                "{:>8} | {:>12.4} | {}",
                series.calls[i],
                score,
                "*".repeat(bar)
            )?;
        }

        if opts.error_bars {
            if let Some(se) = data.standard_error {
                writeln!(self.out, "standard error: {se:.4}")?;
            }
        }
        if let Some(best) = data.best_in_set {
            writeln!(self.out, "Best in Dataset ({best})")?;
        }
        self.out.flush()?;
        Ok(())
    }
}
