use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::{ClueId, Coordinate, RankedClue, TriagedClue};

/// Request understood by the clue meister agent
#[derive(Debug, Clone, PartialEq)]
pub enum ClueMessage {
    GetClues,
    GetClueText,
    GetStatus,
    UpdateStatus(String),
    UpdatePath(Vec<Coordinate>),
    RankClues,
    FlagClue(ClueId),
    AskHumanQuery(String),
    ExtractClues(String),
    FlagClues,
    ClusterClues,
    GetClusters,
    TriageClues,
    /// Any shape not listed above
    Unknown,
}

/// JSON shape of one request key, e.g. `{"rank_clues": true}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum WireMessage {
    GetClues(bool),
    GetClueText(bool),
    GetStatus(bool),
    UpdateStatus(String),
    UpdatePath(Vec<Coordinate>),
    RankClues(bool),
    FlagClue(ClueId),
    AskHumanQuery(String),
    ExtractClues(String),
    FlagClues(bool),
    ClusterClues(bool),
    GetClusters(bool),
    TriageClues(bool),
}

impl From<WireMessage> for ClueMessage {
    fn from(wire: WireMessage) -> Self {
        let flag = |set: bool, message: ClueMessage| if set { message } else { ClueMessage::Unknown };

        match wire {
            WireMessage::GetClues(set) => flag(set, ClueMessage::GetClues),
            WireMessage::GetClueText(set) => flag(set, ClueMessage::GetClueText),
            WireMessage::GetStatus(set) => flag(set, ClueMessage::GetStatus),
            WireMessage::UpdateStatus(status) => ClueMessage::UpdateStatus(status),
            WireMessage::UpdatePath(path) => ClueMessage::UpdatePath(path),
            WireMessage::RankClues(set) => flag(set, ClueMessage::RankClues),
            WireMessage::FlagClue(id) => ClueMessage::FlagClue(id),
            WireMessage::AskHumanQuery(query) if query.is_empty() => ClueMessage::Unknown,
            WireMessage::AskHumanQuery(query) => ClueMessage::AskHumanQuery(query),
            WireMessage::ExtractClues(text) => ClueMessage::ExtractClues(text),
            WireMessage::FlagClues(set) => flag(set, ClueMessage::FlagClues),
            WireMessage::ClusterClues(set) => flag(set, ClueMessage::ClusterClues),
            WireMessage::GetClusters(set) => flag(set, ClueMessage::GetClusters),
            WireMessage::TriageClues(set) => flag(set, ClueMessage::TriageClues),
        }
    }
}

impl ClueMessage {
    /// Decode a JSON request; unrecognised shapes and `false` flags become `Unknown`.
    ///
    /// Keys are tried in map order and the first one that decodes to a known
    /// request wins; extra keys such as `request_id` are ignored.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            tracing::debug!("Unrecognised message {}", value);
            return ClueMessage::Unknown;
        };

        for (key, payload) in object {
            let entry = Value::Object(Map::from_iter([(key.clone(), payload.clone())]));
            match WireMessage::deserialize(&entry) {
                Ok(wire) => match ClueMessage::from(wire) {
                    ClueMessage::Unknown => continue,
                    message => return message,
                },
                Err(e) => tracing::debug!("Skipping message key {}: {}", key, e),
            }
        }

        tracing::debug!("Unrecognised message {}", value);
        ClueMessage::Unknown
    }

    /// Whether handling needs the language model
    pub fn needs_model(&self) -> bool {
        matches!(
            self,
            ClueMessage::ExtractClues(_) | ClueMessage::FlagClues | ClueMessage::ClusterClues
        )
    }
}

/// Reply payload; each variant serializes to its own JSON object shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClueResponse {
    Clues { clues: BTreeMap<ClueId, String> },
    ClueText { clue_text: String },
    Status { status: String },
    StatusUpdated { status: String, new_status: String },
    PathUpdated { status: String, path_length: usize },
    Ranked { ranked_clues: Vec<RankedClue> },
    ClueFlagged { clue_id: ClueId },
    QueryAdded { response: String },
    Extracted { clues: Vec<String> },
    Info { info: String },
    Clusters { clusters: BTreeMap<u32, Vec<ClueId>> },
    Triaged { triaged_clues: Vec<TriagedClue> },
    Error { error: String },
}

impl ClueResponse {
    pub fn error(message: impl Into<String>) -> Self {
        ClueResponse::Error { error: message.into() }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ClueResponse::Error { .. })
    }
}
