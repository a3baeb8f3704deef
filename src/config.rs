use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ProgressError, Result};

/// Chart presentation settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Inclusive x-axis range; derived from the data when absent.
    pub x_limits: Option<(f64, f64)>,
    /// Inclusive y-axis range; derived from the data when absent.
    pub y_limits: Option<(f64, f64)>,
    /// Draw a +/- standard error band around the recorded points.
    pub error_bars: bool,
    /// Image to write. PNG unless the extension is `.svg`; empty disables it.
    pub output: Option<PathBuf>,
    /// Also display the chart on the terminal.
    pub show: bool,
    pub width: u32,
    pub height: u32,
    /// Legend entry for the recorded points.
    pub series_label: String,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: "Number of Oracle Calls".to_string(),
            y_label: "Best Score Found (Higher is Better)".to_string(),
            x_limits: None,
            y_limits: None,
            error_bars: true,
            output: Some(PathBuf::from("plot.png")),
            show: true,
            width: 1200,
            height: 1000,
            series_label: "LOL-BO Progress".to_string(),
        }
    }
}

impl PlotOptions {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ProgressError::Config(format!(
                "image size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        for (axis, limits) in [("x", self.x_limits), ("y", self.y_limits)] {
            if let Some((lo, hi)) = limits {
                if !(lo < hi) {
                    return Err(ProgressError::Config(format!(
                        "{axis} limits must satisfy min < max, got ({lo}, {hi})"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// One chart to produce from one log.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobConfig {
    /// Optimiser terminal output.
    pub log: PathBuf,
    /// Task label used in the `Best <task> Score:` lines.
    pub task: String,
    /// Best score present in the training data, drawn as a reference line.
    #[serde(default)]
    pub best_in_set: Option<f64>,
    /// Optional CSV dump of the expanded staircase.
    #[serde(default)]
    pub csv: Option<PathBuf>,
    #[serde(default)]
    pub plot: PlotOptions,
}

/// A list of jobs loaded from a TOML or JSON file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BatchConfig {
    #[serde(default, rename = "job")]
    pub jobs: Vec<JobConfig>,
}

impl BatchConfig {
    /// Load configuration from the given path. JSON when the extension is
    /// `.json`, TOML otherwise. Relative paths inside jobs are resolved
    /// against the directory holding the config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ProgressError::Config(format!("reading {}: {e}", path.display()))
        })?;
        let mut config = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&content)?
        } else {
            Self::from_toml(&content)?
        };
        if let Some(base) = path.parent() {
            config.resolve_relative(base);
        }
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| ProgressError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| ProgressError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for job in &self.jobs {
            if job.task.trim().is_empty() {
                return Err(ProgressError::Config(format!(
                    "job for {} has an empty task label",
                    job.log.display()
                )));
            }
            job.plot.validate()?;
        }
        Ok(())
    }

    fn resolve_relative(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() && !p.as_os_str().is_empty() {
                *p = base.join(&*p);
            }
        };
        for job in &mut self.jobs {
            join(&mut job.log);
            if let Some(csv) = job.csv.as_mut() {
                join(csv);
            }
            if let Some(out) = job.plot.output.as_mut() {
                join(out);
            }
        }
    }
}

/// Parse `MIN,MAX` into an axis range.
pub fn parse_limits(s: &str) -> std::result::Result<(f64, f64), String> {
    let (lo, hi) = s
        .split_once(',')
        .ok_or_else(|| format!("expected MIN,MAX, got {s:?}"))?;
    let lo: f64 = lo.trim().parse().map_err(|_| format!("invalid minimum {lo:?}"))?;
    let hi: f64 = hi.trim().parse().map_err(|_| format!("invalid maximum {hi:?}"))?;
    if !(lo < hi) {
        return Err(format!("minimum {lo} must be below maximum {hi}"));
    }
    Ok((lo, hi))
}
