use std::collections::BTreeMap;

use crate::core::{ClueId, Coordinate, RankedClue};
use crate::error::Result;
use crate::ranking::{min_distance_to_path, score_clues, ClueRanker};

/// Proximity ranker measuring perpendicular distance to path segments.
///
/// Opt-in alternative to [`VertexRanker`](crate::ranking::VertexRanker); a
/// single-point path falls back to vertex distance.
pub struct SegmentRanker;

impl SegmentRanker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SegmentRanker {
    fn default() -> Self {
        Self::new()
    }
}

fn min_distance_to_segments(coordinate: &Coordinate, path: &[Coordinate]) -> Option<f64> {
    if path.len() < 2 {
        return min_distance_to_path(coordinate, path);
    }

    path.windows(2)
        .map(|w| coordinate.distance_to_segment(&w[0], &w[1]))
        .min_by(f64::total_cmp)
}

impl ClueRanker for SegmentRanker {
    fn rank(&self, path: &[Coordinate], clues: &BTreeMap<ClueId, String>) -> Result<Vec<RankedClue>> {
        score_clues(path, clues, min_distance_to_segments)
    }

    fn name(&self) -> &str {
        "segment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClueMeisterError;

    #[test]
    fn test_segment_midpoint() {
        let ranker = SegmentRanker::new();
        let path = vec![Coordinate::new(0.0, 0.0), Coordinate::new(100.0, 0.0)];
        let clues = BTreeMap::from([(1, "footprint at 50,0".to_string())]);

        let ranked = ranker.rank(&path, &clues).unwrap();
        assert_eq!(ranked[0].score, 110.0);
    }

    #[test]
    fn test_single_point_path() {
        let ranker = SegmentRanker::new();
        let clues = BTreeMap::from([(1, "IR signature at 3,4".to_string())]);

        let ranked = ranker.rank(&[Coordinate::new(0.0, 0.0)], &clues).unwrap();
        assert_eq!(ranked[0].score, 125.0);
    }

    #[test]
    fn test_empty_path_is_error() {
        let ranker = SegmentRanker::new();
        let result = ranker.rank(&[], &BTreeMap::new());
        assert!(matches!(result, Err(ClueMeisterError::PathNotSet)));
    }
}
