use std::collections::BTreeMap;

use crate::core::{ClueId, Coordinate, RankedClue};
use crate::error::Result;
use crate::ranking::{min_distance_to_path, score_clues, ClueRanker};

/// Proximity ranker measuring distance to the nearest path vertex
pub struct VertexRanker;

impl VertexRanker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VertexRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl ClueRanker for VertexRanker {
    fn rank(&self, path: &[Coordinate], clues: &BTreeMap<ClueId, String>) -> Result<Vec<RankedClue>> {
        score_clues(path, clues, min_distance_to_path)
    }

    fn name(&self) -> &str {
        "vertex"
    }
}
