//! Progress points recovered from an optimisation log and their expansion
//! into a dense "best score so far" staircase.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ProgressError, Result};

/// A single improvement event: the best score known after `oracle_calls`
/// objective evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressPoint {
    pub oracle_calls: u64,
    pub best_score: f64,
}

impl ProgressPoint {
    pub fn new(oracle_calls: u64, best_score: f64) -> Self {
        Self {
            oracle_calls,
            best_score,
        }
    }
}

/// Mapping from oracle call count to best score, kept in the order keys
/// were first discovered.
///
/// Inserting an existing key overwrites its score in place, so a key keeps
/// the position of its first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressMap {
    points: Vec<ProgressPoint>,
    /// Call count to position in `points`.
    index: HashMap<u64, usize>,
}

impl ProgressMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, returning the previous score for `oracle_calls` if
    /// there was one.
    pub fn insert(&mut self, oracle_calls: u64, best_score: f64) -> Option<f64> {
        match self.index.get(&oracle_calls) {
            Some(&pos) => {
                let existing = &mut self.points[pos];
                let previous = existing.best_score;
                warn!(
                    oracle_calls,
                    previous, best_score, "duplicate oracle call count, keeping the later score"
                );
                existing.best_score = best_score;
                Some(previous)
            }
            None => {
                self.index.insert(oracle_calls, self.points.len());
                self.points.push(ProgressPoint::new(oracle_calls, best_score));
                None
            }
        }
    }

    pub fn get(&self, oracle_calls: u64) -> Option<f64> {
        self.index
            .get(&oracle_calls)
            .map(|&pos| self.points[pos].best_score)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in discovery order.
    pub fn points(&self) -> &[ProgressPoint] {
        &self.points
    }

    pub fn oracle_calls(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.oracle_calls).collect()
    }

    pub fn scores(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.best_score).collect()
    }

    pub fn max_oracle_calls(&self) -> Option<u64> {
        self.points.iter().map(|p| p.oracle_calls).max()
    }

    pub fn expand(&self) -> Result<ExpandedSeries> {
        expand(&self.points)
    }
}

impl FromIterator<(u64, f64)> for ProgressMap {
    fn from_iter<I: IntoIterator<Item = (u64, f64)>>(iter: I) -> Self {
        let mut map = ProgressMap::new();
        for (calls, score) in iter {
            map.insert(calls, score);
        }
        map
    }
}

/// Dense staircase: `calls[i] == i + 1` and `scores[i]` is the best score
/// known after that many oracle calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpandedSeries {
    pub calls: Vec<u64>,
    pub scores: Vec<f64>,
}

impl ExpandedSeries {
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.calls.iter().copied().zip(self.scores.iter().copied())
    }
}

/// Largest call count [`expand`] will materialise. Two dense vectors of this
/// length take 4 GiB.
pub const MAX_EXPANDED_CALLS: u64 = 1 << 28;

/// Expand sparse improvement events into one value per oracle call.
///
/// Points are ordered by call count first; a repeated call count keeps its
/// last occurrence. Indices before the first point hold `0.0`. A call
/// count of zero has no index and is rejected, as is a count above
/// [`MAX_EXPANDED_CALLS`] or one whose series cannot be allocated.
pub fn expand(points: &[ProgressPoint]) -> Result<ExpandedSeries> {
    if let Some(bad) = points.iter().find(|p| p.oracle_calls == 0) {
        return Err(ProgressError::InvalidPoint(format!(
            "oracle call count must be positive (score {})",
            bad.best_score
        )));
    }

    let mut ordered = points.to_vec();
    ordered.sort_by_key(|p| p.oracle_calls);
    // keep the last of each run of equal call counts
    let mut deduped: Vec<ProgressPoint> = Vec::with_capacity(ordered.len());
    for point in ordered {
        match deduped.last_mut() {
            Some(last) if last.oracle_calls == point.oracle_calls => *last = point,
            _ => deduped.push(point),
        }
    }

    let Some(max_calls) = deduped.last().map(|p| p.oracle_calls) else {
        return Ok(ExpandedSeries::default());
    };
    let too_large =
        || ProgressError::InvalidPoint(format!("oracle call count {max_calls} is too large"));
    if max_calls > MAX_EXPANDED_CALLS {
        return Err(too_large());
    }
    let len = usize::try_from(max_calls).map_err(|_| too_large())?;

    let mut calls: Vec<u64> = Vec::new();
    calls.try_reserve_exact(len).map_err(|_| too_large())?;
    calls.extend(1..=max_calls);
    let mut scores: Vec<f64> = Vec::new();
    scores.try_reserve_exact(len).map_err(|_| too_large())?;
    scores.resize(len, 0.0);
    let mut current_best = 0.0;
    let mut filled = 0usize;
    for point in &deduped {
        let idx = (point.oracle_calls - 1) as usize;
        scores[filled..idx].fill(current_best);
        current_best = point.best_score;
        scores[idx] = current_best;
        filled = idx + 1;
    }
    debug!(points = deduped.len(), len, "expanded progress series");

    Ok(ExpandedSeries { calls, scores })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(u64, f64)]) -> Vec<ProgressPoint> {
        raw.iter().map(|&(c, s)| ProgressPoint::new(c, s)).collect()
    }

    #[test]
    fn expands_two_points_into_staircase() {
        let series = expand(&pts(&[(3, 5.0), (7, 9.0)])).unwrap();
        assert_eq!(series.calls, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(series.scores, vec![0.0, 0.0, 5.0, 5.0, 5.0, 5.0, 9.0]);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let series = expand(&[]).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn first_call_point() {
        let series = expand(&pts(&[(1, 2.0), (3, 4.0)])).unwrap();
        assert_eq!(series.scores, vec![2.0, 2.0, 4.0]);
    }

    #[test]
    fn unsorted_points_are_ordered() {
        let sorted = expand(&pts(&[(2, 1.0), (5, 3.0), (9, 4.5)])).unwrap();
        let shuffled = expand(&pts(&[(9, 4.5), (2, 1.0), (5, 3.0)])).unwrap();
        assert_eq!(sorted, shuffled);
    }

    #[test]
    fn duplicate_call_count_keeps_last() {
        let series = expand(&pts(&[(2, 1.0), (2, 7.0)])).unwrap();
        assert_eq!(series.scores, vec![0.0, 7.0]);
    }

    #[test]
    fn zero_call_count_rejected() {
        let err = expand(&pts(&[(0, 1.0), (4, 2.0)])).unwrap_err();
        assert!(matches!(err, ProgressError::InvalidPoint(_)));
    }

    #[test]
    fn huge_call_count_is_an_error() {
        for calls in [u64::MAX, MAX_EXPANDED_CALLS + 1] {
            let err = expand(&pts(&[(3, 1.0), (calls, 2.5)])).unwrap_err();
            assert!(matches!(err, ProgressError::InvalidPoint(_)), "{calls}");
        }
    }

    #[test]
    fn map_overwrite_keeps_position() {
        let mut map = ProgressMap::new();
        assert_eq!(map.insert(10, 1.0), None);
        assert_eq!(map.insert(20, 2.0), None);
        assert_eq!(map.insert(10, 3.0), Some(1.0));
        assert_eq!(map.oracle_calls(), vec![10, 20]);
        assert_eq!(map.scores(), vec![3.0, 2.0]);
        assert_eq!(map.max_oracle_calls(), Some(20));
        assert_eq!(map.get(10), Some(3.0));
        assert_eq!(map.get(30), None);
    }

    #[test]
    fn many_keys_keep_discovery_order() {
        let map: ProgressMap = (1..=5000u64).rev().map(|c| (c, c as f64)).collect();
        assert_eq!(map.len(), 5000);
        assert_eq!(map.points()[0].oracle_calls, 5000);
        assert_eq!(map.get(1), Some(1.0));
        let again: ProgressMap = map.points().iter().map(|p| (p.oracle_calls, p.best_score)).collect();
        assert_eq!(map, again);
    }
}
