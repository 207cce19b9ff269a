pub mod segment;
pub mod vertex;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{parse_clue, ranked_clue::sort_ranked, ClueId, Coordinate, RankedClue};
use crate::error::{ClueMeisterError, Result};

pub use segment::SegmentRanker;
pub use vertex::VertexRanker;

/// Full proximity bonus for a clue sitting on the path
pub const MAX_PROXIMITY_BONUS: f64 = 100.0;

/// Trait for clue ranking implementations
pub trait ClueRanker: Send + Sync {
    /// Rank every clue against the path, sorted by score (highest first)
    fn rank(&self, path: &[Coordinate], clues: &BTreeMap<ClueId, String>) -> Result<Vec<RankedClue>>;

    /// Get ranker name for logging
    fn name(&self) -> &str;
}

/// Ranking strategy selectable from config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingMethod {
    #[default]
    Vertex,
    Segment,
}

impl RankingMethod {
    pub fn ranker(self) -> Box<dyn ClueRanker> {
        match self {
            RankingMethod::Vertex => Box::new(VertexRanker::new()),
            RankingMethod::Segment => Box::new(SegmentRanker::new()),
        }
    }
}

/// Minimum distance from `coordinate` to any path vertex; `None` for an empty path
pub fn min_distance_to_path(coordinate: &Coordinate, path: &[Coordinate]) -> Option<f64> {
    path.iter()
        .map(|point| coordinate.distance_to(point))
        .min_by(f64::total_cmp)
}

/// `max(0, 100 - distance)`
pub fn proximity_bonus(distance: f64) -> f64 {
    (MAX_PROXIMITY_BONUS - distance).max(0.0)
}

/// Shared scoring loop: type points plus proximity bonus under `distance`
pub(crate) fn score_clues<F>(
    path: &[Coordinate],
    clues: &BTreeMap<ClueId, String>,
    distance: F,
) -> Result<Vec<RankedClue>>
where
    F: Fn(&Coordinate, &[Coordinate]) -> Option<f64>,
{
    if path.is_empty() {
        return Err(ClueMeisterError::PathNotSet);
    }

    let mut ranked: Vec<RankedClue> = clues
        .iter()
        .map(|(&id, description)| {
            let parsed = parse_clue(description);
            let type_points = f64::from(parsed.clue_type().points());
            let bonus = distance(&parsed.coordinate, path)
                .map(proximity_bonus)
                .unwrap_or(0.0);

            RankedClue::new(id, description.as_str(), type_points + bonus)
        })
        .collect();

    sort_ranked(&mut ranked);

    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_distance_to_path() {
        let path = vec![Coordinate::new(0.0, 0.0), Coordinate::new(10.0, 0.0)];
        assert_eq!(min_distance_to_path(&Coordinate::new(7.0, 0.0), &path), Some(3.0));
        assert_eq!(min_distance_to_path(&Coordinate::new(0.0, 0.0), &[]), None);
    }

    #[test]
    fn test_proximity_bonus_clamped() {
        assert_eq!(proximity_bonus(0.0), 100.0);
        assert_eq!(proximity_bonus(40.0), 60.0);
        assert_eq!(proximity_bonus(1000.0), 0.0);
        assert_eq!(proximity_bonus(f64::NAN), 0.0);
    }

    #[test]
    fn test_method_selects_ranker() {
        assert_eq!(RankingMethod::default().ranker().name(), "vertex");
        assert_eq!(RankingMethod::Segment.ranker().name(), "segment");
    }
}
