use serde::{Deserialize, Serialize};

use crate::core::{ClueId, Coordinate};

/// Ranked output record, recomputed on every ranking request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedClue {
    pub id: ClueId,
    pub description: String,
    /// Type points plus proximity bonus
    pub score: f64,
}

impl RankedClue {
    pub fn new(id: ClueId, description: impl Into<String>, score: f64) -> Self {
        Self {
            id,
            description: description.into(),
            score,
        }
    }

    /// Get display string for logging
    pub fn display(&self) -> String {
        format!("#{} {} ({:.1})", self.id, self.description, self.score)
    }
}

/// Clue that survived the rule pass, with its accumulated priority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriagedClue {
    pub id: ClueId,
    pub description: String,
    pub coordinate: Coordinate,
    pub priority: i32,
}

/// Sort highest score first, ties by ascending id
pub(crate) fn sort_ranked(ranked: &mut [RankedClue]) {
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_ranked_tie_break() {
        let mut ranked = vec![
            RankedClue::new(3, "c", 10.0),
            RankedClue::new(1, "a", 10.0),
            RankedClue::new(2, "b", 50.0),
        ];
        sort_ranked(&mut ranked);

        let ids: Vec<ClueId> = ranked.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_serialization_shape() {
        let json = serde_json::to_value(RankedClue::new(7, "red hat at 0,0", 120.0)).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["description"], "red hat at 0,0");
        assert_eq!(json["score"], 120.0);
    }
}
