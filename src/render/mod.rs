//! Chart output. Parsing and expansion never depend on a backend; they hand
//! a finished [`ChartData`] to a [`RenderSink`].

mod chart;
mod terminal;

pub use chart::{ChartFormat, PlottersSink};
pub use terminal::TerminalSink;

use std::io;

use tracing::info;

use crate::config::PlotOptions;
use crate::error::Result;
use crate::progress::{ExpandedSeries, ProgressMap};
use crate::stats::standard_error;

/// Everything a sink needs to draw one progress chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    /// Recorded oracle call counts, discovery order.
    pub calls: Vec<u64>,
    /// Recorded best scores aligned with `calls`.
    pub scores: Vec<f64>,
    pub expanded: Option<ExpandedSeries>,
    pub standard_error: Option<f64>,
    /// Horizontal reference value (best score in the dataset). `None` omits
    /// the line; any `Some`, including `Some(0.0)`, draws it.
    pub best_in_set: Option<f64>,
}

impl ChartData {
    pub fn from_map(map: &ProgressMap, best_in_set: Option<f64>) -> Result<Self> {
        let scores = map.scores();
        Ok(Self {
            calls: map.oracle_calls(),
            standard_error: standard_error(&scores),
            scores,
            expanded: Some(map.expand()?),
            best_in_set,
        })
    }

    /// Recorded points as `(calls, score)` sorted by call count.
    pub fn sorted_points(&self) -> Vec<(f64, f64)> {
        let mut pts: Vec<(f64, f64)> = self
            .calls
            .iter()
            .zip(&self.scores)
            .map(|(&c, &s)| (c as f64, s))
            .collect();
        pts.sort_by(|a, b| a.0.total_cmp(&b.0));
        pts
    }

    pub fn x_range(&self, opts: &PlotOptions) -> (f64, f64) {
        if let Some(limits) = opts.x_limits {
            return limits;
        }
        let max = self.calls.iter().copied().max().unwrap_or(0) as f64;
        (0.0, max.max(1.0))
    }

    pub fn y_range(&self, opts: &PlotOptions) -> (f64, f64) {
        if let Some(limits) = opts.y_limits {
            return limits;
        }
        let se = if opts.error_bars {
            self.standard_error.unwrap_or(0.0)
        } else {
            0.0
        };
        let mut lo = 0.0f64;
        let mut hi = f64::MIN;
        for &s in self.scores.iter().filter(|s| s.is_finite()) {
            lo = lo.min(s - se);
            hi = hi.max(s + se);
        }
        if let Some(best) = self.best_in_set {
            lo = lo.min(best);
            hi = hi.max(best);
        }
        if hi <= lo {
            return (lo, lo + 1.0);
        }
        let pad = (hi - lo) * 0.05;
        (lo - if lo < 0.0 { pad } else { 0.0 }, hi + pad)
    }
}

/// Capability to turn chart data into a visual artifact.
pub trait RenderSink {
    fn render(&mut self, data: &ChartData, opts: &PlotOptions) -> Result<()>;
}

/// Write the image when `opts.output` is a non-empty path and print the
/// terminal chart when `opts.show` is set.
pub fn render(data: &ChartData, opts: &PlotOptions) -> Result<()> {
    opts.validate()?;
    if let Some(path) = opts.output.as_ref().filter(|p| !p.as_os_str().is_empty()) {
        PlottersSink::new(path).render(data, opts)?;
        info!(path = %path.display(), "wrote chart");
    }
    if opts.show {
        TerminalSink::new(io::stdout().lock()).render(data, opts)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> ChartData {
        let map: ProgressMap = [(3, 5.0), (7, 9.0)].into_iter().collect();
        ChartData::from_map(&map, Some(10.0)).unwrap()
    }

    #[test]
    fn from_map_fills_everything() {
        let d = data();
        assert_eq!(d.calls, vec![3, 7]);
        assert_eq!(d.expanded.as_ref().map(|e| e.len()), Some(7));
        assert!(d.standard_error.is_some());
    }

    #[test]
    fn explicit_limits_win() {
        let opts = PlotOptions {
            x_limits: Some((0.0, 500.0)),
            y_limits: Some((0.0, 600.0)),
            ..PlotOptions::default()
        };
        assert_eq!(data().x_range(&opts), (0.0, 500.0));
        assert_eq!(data().y_range(&opts), (0.0, 600.0));
    }

    #[test]
    fn derived_range_covers_reference_line() {
        let opts = PlotOptions {
            error_bars: false,
            ..PlotOptions::default()
        };
        let (lo, hi) = data().y_range(&opts);
        assert_eq!(lo, 0.0);
        assert!(hi > 10.0);
        assert_eq!(data().x_range(&opts), (0.0, 7.0));
    }

    #[test]
    fn empty_data_has_usable_range() {
        let d = ChartData::default();
        let opts = PlotOptions::default();
        assert_eq!(d.x_range(&opts), (0.0, 1.0));
        assert_eq!(d.y_range(&opts), (0.0, 1.0));
    }

    #[test]
    fn negative_reference_value_widens_range() {
        let map: ProgressMap = [(3, 5.0), (7, 9.0)].into_iter().collect();
        let d = ChartData::from_map(&map, Some(-2.0)).unwrap();
        let opts = PlotOptions {
            error_bars: false,
            ..PlotOptions::default()
        };
        assert!(d.y_range(&opts).0 <= -2.0);
    }

    #[test]
    fn sink_trait_object() {
        struct Count(usize);
        impl RenderSink for Count {
            fn render(&mut self, data: &ChartData, _: &PlotOptions) -> Result<()> {
                self.0 += data.calls.len();
                Ok(())
            }
        }
        let mut sink = Count(0);
        let dyn_sink: &mut dyn RenderSink = &mut sink;
        dyn_sink.render(&data(), &PlotOptions::default()).unwrap();
        assert_eq!(sink.0, 2);
    }
}
