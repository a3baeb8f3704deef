use std::fs;
use std::panic;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{ChartData, RenderSink};
use crate::config::PlotOptions;
use crate::error::{ProgressError, Result};

const MARKER: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Png,
    Svg,
}

impl ChartFormat {
    /// SVG for a `.svg` extension, PNG for anything else.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => ChartFormat::Svg,
            _ => ChartFormat::Png,
        }
    }
}

/// Draws the progress chart into an image file with plotters.
#[derive(Debug, Clone)]
pub struct PlottersSink {
    path: PathBuf,
    format: ChartFormat,
}

impl PlottersSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = ChartFormat::from_path(&path);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ChartFormat {
        self.format
    }
}

impl RenderSink for PlottersSink {
    fn render(&mut self, data: &ChartData, opts: &PlotOptions) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let size = (opts.width, opts.height);
        let path = self.path.as_path();
        let format = self.format;
        // font lookup inside some backends panics instead of erroring
        let drawn = panic::catch_unwind(panic::AssertUnwindSafe(|| match format {
            ChartFormat::Png => {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                draw_chart(root, data, opts).map_err(|e| e.to_string())
            }
            ChartFormat::Svg => {
                let root = SVGBackend::new(path, size).into_drawing_area();
                draw_chart(root, data, opts).map_err(|e| e.to_string())
            }
        }));
        match drawn {
            Ok(Ok(())) => Ok(()),
            Ok(Err(msg)) => Err(ProgressError::Render(msg)),
            Err(_) => Err(ProgressError::Render("plotting backend panicked".into())),
        }
    }
}

fn diamond(x: i32, y: i32) -> Vec<(i32, i32)> {
    vec![(x, y - MARKER), (x + MARKER, y), (x, y + MARKER), (x - MARKER, y)]
}

fn draw_chart<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    data: &ChartData,
    opts: &PlotOptions,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let (x0, x1) = data.x_range(opts);
    let (y0, y1) = data.y_range(opts);

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70);
    if !opts.title.is_empty() {
        builder.caption(opts.title.as_str(), ("sans-serif", 32).into_font());
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc(opts.x_label.as_str())
        .y_desc(opts.y_label.as_str())
        .draw()?;

    let points = data.sorted_points();

    if opts.error_bars {
        if let Some(se) = data.standard_error.filter(|_| points.len() > 1) {
            let mut band: Vec<(f64, f64)> = points.iter().map(|&(x, y)| (x, y + se)).collect();
            band.extend(points.iter().rev().map(|&(x, y)| (x, y - se)));
            chart.draw_series(std::iter::once(Polygon::new(band, BLUE.mix(0.2).filled())))?;
        }
    }

    if let Some(expanded) = data.expanded.as_ref().filter(|e| !e.is_empty()) {
        let steps = expanded
            .calls
            .iter()
            .zip(expanded.scores.iter())
            .map(|(&c, &s)| (c as f64, s));
        chart.draw_series(DashedLineSeries::new(steps, 8, 6, BLUE.stroke_width(2)))?;
    }

    chart
        .draw_series(
            points
                .iter()
                .map(|&p| EmptyElement::at(p) + Polygon::new(diamond(0, 0), BLUE.filled())),
        )?
        .label(opts.series_label.as_str())
        .legend(|(x, y)| Polygon::new(diamond(x + 10, y), BLUE.filled()));

    if let Some(best) = data.best_in_set {
        chart
            .draw_series(DashedLineSeries::new(
                vec![(x0, best), (x1, best)],
                2,
                4,
                BLACK.stroke_width(2),
            ))?
            .label(format!("Best in Dataset ({best})"))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
