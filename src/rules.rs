use std::sync::Arc;

use crate::core::{parse_clue, ClueId, TriagedClue};
use crate::coverage::{InfraredCoverage, PhotoCoverage};
use crate::error::Result;
use crate::knowledge::KnowledgeBase;

pub const PHOTO_PATH_BOOST: i32 = 10;
pub const INFRARED_BOOST: i32 = 20;
pub const INTERVIEW_BOOST: i32 = 5;

/// Deterministic SAR rules: grid filter plus coverage boosts
pub struct RuleEngine {
    kb: Arc<dyn KnowledgeBase>,
    photo: Arc<dyn PhotoCoverage>,
    infrared: Arc<dyn InfraredCoverage>,
}

impl RuleEngine {
    pub fn new(
        kb: Arc<dyn KnowledgeBase>,
        photo: Arc<dyn PhotoCoverage>,
        infrared: Arc<dyn InfraredCoverage>,
    ) -> Self {
        Self { kb, photo, infrared }
    }

    /// Apply the rules to one clue; `None` when it falls outside the search grid
    pub async fn apply(&self, id: ClueId, description: &str) -> Result<Option<TriagedClue>> {
        let coordinate = parse_clue(description).coordinate;

        if !self.kb.is_within_grid(coordinate).await? {
            tracing::debug!("Clue {} outside search grid, dropped", id);
            return Ok(None);
        }

        let mut priority = 0;
        if self.photo.path_intersects(coordinate) {
            priority += PHOTO_PATH_BOOST;
        }
        if self.infrared.overlaps(coordinate) {
            priority += INFRARED_BOOST;
        }
        if self.kb.interview_supports_path(coordinate).await? {
            priority += INTERVIEW_BOOST;
        }

        Ok(Some(TriagedClue {
            id,
            description: description.to_string(),
            coordinate,
            priority,
        }))
    }

    /// Triage every clue in the knowledge base, highest priority first
    pub async fn triage(&self) -> Result<Vec<TriagedClue>> {
        let clues = self.kb.get_clues().await?;

        let mut triaged = Vec::with_capacity(clues.len());
        for (id, description) in &clues {
            if let Some(clue) = self.apply(*id, description).await? {
                triaged.push(clue);
            }
        }

        triaged.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));

        tracing::info!("🧭 Triaged {}/{} clues", triaged.len(), clues.len());

        Ok(triaged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Coordinate;
    use crate::coverage::{InfraredHotspots, NoCoverage, PhotoTrack};
    use crate::knowledge::{SearchGrid, SqliteKnowledgeBase};

    async fn kb() -> Arc<SqliteKnowledgeBase> {
        Arc::new(SqliteKnowledgeBase::new(":memory:").await.unwrap())
    }

    #[tokio::test]
    async fn test_boosts_accumulate() {
        let kb = kb().await;
        kb.add_interview_sighting(Coordinate::new(1.0, 1.0), 0.5).await.unwrap();

        let engine = RuleEngine::new(
            kb,
            Arc::new(PhotoTrack::new(vec![Coordinate::new(1.0, 1.0)], 0.1)),
            Arc::new(InfraredHotspots::new(vec![Coordinate::new(1.0, 1.0)], 0.1)),
        );

        let clue = engine.apply(1, "red hat at 1,1").await.unwrap().unwrap();
        assert_eq!(clue.priority, 35);
        assert_eq!(clue.coordinate, Coordinate::new(1.0, 1.0));

        let far = engine.apply(2, "red hat at 50,50").await.unwrap().unwrap();
        assert_eq!(far.priority, 0);
    }

    #[tokio::test]
    async fn test_outside_grid_dropped() {
        let kb = kb().await;
        kb.set_search_grid(SearchGrid { min_lat: 0.0, min_lon: 0.0, max_lat: 10.0, max_lon: 10.0 })
            .await
            .unwrap();
        kb.add_clue("footprint at 5,5").await.unwrap();
        kb.add_clue("footprint at 50,50").await.unwrap();

        let engine = RuleEngine::new(kb, Arc::new(NoCoverage), Arc::new(NoCoverage));
        let triaged = engine.triage().await.unwrap();

        assert_eq!(triaged.len(), 1);
        assert_eq!(triaged[0].description, "footprint at 5,5");
    }

    #[tokio::test]
    async fn test_triage_order() {
        let kb = kb().await;
        kb.add_clue("footprint at 9,9").await.unwrap();
        kb.add_clue("IR signature at 2,2").await.unwrap();
        kb.add_clue("red hat at 8,8").await.unwrap();

        let engine = RuleEngine::new(
            kb,
            Arc::new(NoCoverage),
            Arc::new(InfraredHotspots::new(vec![Coordinate::new(2.0, 2.0)], 0.5)),
        );
        let triaged = engine.triage().await.unwrap();

        let ids: Vec<ClueId> = triaged.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }
}
