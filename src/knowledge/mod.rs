pub mod sqlite;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{ClueId, Coordinate};
use crate::error::Result;

pub use sqlite::SqliteKnowledgeBase;

/// Tag applied to clues the language model marks as related
pub const AI_FLAGGED_TAG: &str = "ai_flagged";

/// Trait for the shared SAR blackboard the agent reads clues from
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Store a new clue, returning its id
    async fn add_clue(&self, description: &str) -> Result<ClueId>;

    /// All clues keyed by id
    async fn get_clues(&self) -> Result<BTreeMap<ClueId, String>>;

    /// Attach `tag` to a clue
    async fn add_clue_tag(&self, clue_id: ClueId, tag: &str) -> Result<()>;

    /// Ids of clues carrying `tag`
    async fn clue_tags(&self, tag: &str) -> Result<Vec<ClueId>>;

    /// Queue a question for the human operators
    async fn add_query(&self, query: &str) -> Result<()>;

    /// Questions queued for the human operators, oldest first
    async fn pending_queries(&self) -> Result<Vec<HumanQuery>>;

    /// Replace the search grid bounds
    async fn set_search_grid(&self, grid: SearchGrid) -> Result<()>;

    /// Whether `coordinate` is inside the search grid (always true with no grid set)
    async fn is_within_grid(&self, coordinate: Coordinate) -> Result<bool>;

    /// Record a location reported by an interview, trusted within `radius`
    async fn add_interview_sighting(&self, coordinate: Coordinate, radius: f64) -> Result<()>;

    /// Whether any interview sighting covers `coordinate`
    async fn interview_supports_path(&self, coordinate: Coordinate) -> Result<bool>;

    /// Get knowledge base statistics
    async fn stats(&self) -> Result<KnowledgeStats>;
}

/// Axis-aligned search area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchGrid {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl SearchGrid {
    pub fn contains(&self, c: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&c.lat) && (self.min_lon..=self.max_lon).contains(&c.lon)
    }
}

/// Operator question with metadata
#[derive(Debug, Clone, Serialize)]
pub struct HumanQuery {
    pub id: i64,
    pub query: String,
    pub asked_at: chrono::DateTime<chrono::Utc>,
}

/// Knowledge base statistics
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeStats {
    pub total_clues: u64,
    pub flagged_clues: u64,
    pub pending_queries: u64,
    pub interview_sightings: u64,
    pub newest_clue: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_contains_edges() {
        let grid = SearchGrid { min_lat: 0.0, min_lon: 0.0, max_lat: 10.0, max_lon: 5.0 };
        assert!(grid.contains(Coordinate::new(0.0, 0.0)));
        assert!(grid.contains(Coordinate::new(10.0, 5.0)));
        assert!(!grid.contains(Coordinate::new(10.1, 1.0)));
        assert!(!grid.contains(Coordinate::new(1.0, -0.1)));
    }
}
