//! Summary statistics over recorded best scores.

use serde::Serialize;

use crate::progress::ProgressMap;

/// Sample standard deviation (`ddof = 1`) divided by `sqrt(n)`.
///
/// `None` when fewer than two scores are available.
pub fn standard_error(scores: &[f64]) -> Option<f64> {
    let n = scores.len();
    if n < 2 {
        return None;
    }
    let mean = scores.iter().sum::<f64>() / n as f64;
    let var = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(var.sqrt() / (n as f64).sqrt())
}

/// Headline numbers for one parsed log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub task: String,
    pub records: usize,
    pub max_oracle_calls: Option<u64>,
    pub best_score: Option<f64>,
    pub standard_error: Option<f64>,
}

impl RunSummary {
    pub fn from_map(task: &str, map: &ProgressMap) -> Self {
        let scores = map.scores();
        let best_score = scores.iter().copied().reduce(f64::max);
        Self {
            task: task.to_string(),
            records: map.len(),
            max_oracle_calls: map.max_oracle_calls(),
            best_score,
            standard_error: standard_error(&scores),
        }
    }
}
