use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::config::{ClueMeisterConfig, ExtractionConfig};
use crate::core::{ClueId, Coordinate, RankedClue, TriagedClue};
use crate::coverage::{InfraredCoverage, NoCoverage, PhotoCoverage};
use crate::error::{Result, ClueMeisterError};
use crate::knowledge::{KnowledgeBase, SqliteKnowledgeBase, AI_FLAGGED_TAG};
use crate::message::{ClueMessage, ClueResponse};
use crate::model::{prompts, GeminiModel, LanguageModel};
use crate::ranking::{ClueRanker, VertexRanker};
use crate::rules::RuleEngine;
use crate::session::{ClueSession, STATUS_PATH_UPDATED};

/// Clue meister agent: dispatches messages against a caller-owned [`ClueSession`]
pub struct ClueMeister {
    kb: Arc<dyn KnowledgeBase>,
    ranker: Arc<dyn ClueRanker>,
    model: Option<Arc<dyn LanguageModel>>,
    photo: Arc<dyn PhotoCoverage>,
    infrared: Arc<dyn InfraredCoverage>,
    extraction: ExtractionConfig,
}

impl ClueMeister {
    /// Create agent over a knowledge base, with vertex ranking and no model
    pub fn new(kb: Arc<dyn KnowledgeBase>) -> Self {
        Self {
            kb,
            ranker: Arc::new(VertexRanker::new()),
            model: None,
            photo: Arc::new(NoCoverage),
            infrared: Arc::new(NoCoverage),
            extraction: ExtractionConfig::default(),
        }
    }

    /// Build agent from config: SQLite knowledge base, configured ranker and,
    /// when an API key is present, the Gemini model
    pub async fn from_config(config: &ClueMeisterConfig) -> Result<Self> {
        let kb = Arc::new(SqliteKnowledgeBase::new(&config.database.path).await?);
        let mut agent = Self::new(kb)
            .with_ranker(Arc::from(config.ranking.method.ranker()))
            .with_extraction(config.extraction.clone());

        match GeminiModel::new(&config.model) {
            Ok(model) => {
                tracing::info!("✅ Language model {} initialized", config.model.name);
                agent = agent.with_model(Arc::new(model));
            }
            Err(e) => {
                tracing::warn!("⚠️ Language model unavailable, LLM requests disabled: {}", e);
            }
        }

        Ok(agent)
    }

    pub fn with_ranker(mut self, ranker: Arc<dyn ClueRanker>) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn with_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_coverage(mut self, photo: Arc<dyn PhotoCoverage>, infrared: Arc<dyn InfraredCoverage>) -> Self {
        self.photo = photo;
        self.infrared = infrared;
        self
    }

    pub fn with_extraction(mut self, extraction: ExtractionConfig) -> Self {
        self.extraction = extraction;
        self
    }

    pub fn knowledge_base(&self) -> &Arc<dyn KnowledgeBase> {
        &self.kb
    }

    pub fn ranker_name(&self) -> &str {
        self.ranker.name()
    }

    /// Decode and handle a JSON request. Never fails: errors become `{"error": ..}`.
    pub async fn process_request(&self, session: &mut ClueSession, message: &Value) -> ClueResponse {
        let message = ClueMessage::from_value(message);
        match self.handle(session, message).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("❌ Request failed: {}", e);
                ClueResponse::error(e.to_string())
            }
        }
    }

    /// Handle a decoded request
    pub async fn handle(&self, session: &mut ClueSession, message: ClueMessage) -> Result<ClueResponse> {
        match message {
            ClueMessage::GetClues => Ok(ClueResponse::Clues {
                clues: self.kb.get_clues().await?,
            }),
            ClueMessage::GetClueText => Ok(ClueResponse::ClueText {
                clue_text: self.clues_to_text().await?,
            }),
            ClueMessage::GetStatus => Ok(ClueResponse::Status {
                status: session.status.clone(),
            }),
            ClueMessage::UpdateStatus(status) => {
                session.status = status.clone();
                Ok(ClueResponse::StatusUpdated {
                    status: "updated".to_string(),
                    new_status: status,
                })
            }
            ClueMessage::UpdatePath(path) => Ok(ClueResponse::PathUpdated {
                path_length: self.set_path(session, path),
                status: STATUS_PATH_UPDATED.to_string(),
            }),
            ClueMessage::RankClues => Ok(ClueResponse::Ranked {
                ranked_clues: self.rank_clues(session).await?,
            }),
            ClueMessage::FlagClue(clue_id) => {
                self.kb.add_clue_tag(clue_id, AI_FLAGGED_TAG).await?;
                Ok(ClueResponse::ClueFlagged { clue_id })
            }
            ClueMessage::AskHumanQuery(query) => {
                self.kb.add_query(&query).await?;
                Ok(ClueResponse::QueryAdded {
                    response: "Added Query".to_string(),
                })
            }
            ClueMessage::ExtractClues(raw_text) => Ok(ClueResponse::Extracted {
                clues: self.extract_clues(&raw_text).await?,
            }),
            ClueMessage::FlagClues => {
                let flagged = self.flag_clues().await?;
                Ok(ClueResponse::Info {
                    info: format!("Flagged {} clues", flagged),
                })
            }
            ClueMessage::ClusterClues => Ok(ClueResponse::Clusters {
                clusters: self.cluster_clues(session).await?,
            }),
            ClueMessage::GetClusters => Ok(ClueResponse::Clusters {
                clusters: session.clusters().clone(),
            }),
            ClueMessage::TriageClues => Ok(ClueResponse::Triaged {
                triaged_clues: self.triage().await?,
            }),
            ClueMessage::Unknown => Err(ClueMeisterError::UnknownRequest),
        }
    }

    /// Replace the session's rescue path; returns the new length
    pub fn set_path(&self, session: &mut ClueSession, path: Vec<Coordinate>) -> usize {
        let length = session.set_path(path);
        tracing::debug!("Path updated ({} points)", length);
        length
    }

    /// Rank every clue against the session path
    pub async fn rank_clues(&self, session: &ClueSession) -> Result<Vec<RankedClue>> {
        if session.path().is_empty() {
            return Err(ClueMeisterError::PathNotSet);
        }

        let start = Instant::now();
        let clues = self.kb.get_clues().await?;
        let ranked = self.ranker.rank(session.path(), &clues)?;

        tracing::info!(
            "✅ Ranked {} clues against {} path points [{}] in {:.2}ms",
            ranked.len(),
            session.path().len(),
            self.ranker.name(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        if let Some(top) = ranked.first() {
            tracing::debug!("Top clue: {}", top.display());
        }

        Ok(ranked)
    }

    /// Human-readable block of all clues, marking flagged ones
    pub async fn clues_to_text(&self) -> Result<String> {
        let clues = self.kb.get_clues().await?;
        let flagged = self.kb.clue_tags(AI_FLAGGED_TAG).await?;

        let mut text = String::from("Clues:\n");
        for (id, description) in &clues {
            let tag = if flagged.contains(id) { " (Already Flagged)" } else { "" };
            text.push_str(&format!("Clue ID #{}: {}{}\n", id, description, tag));
        }

        Ok(text)
    }

    /// Apply the deterministic SAR rules to every clue
    pub async fn triage(&self) -> Result<Vec<TriagedClue>> {
        RuleEngine::new(self.kb.clone(), self.photo.clone(), self.infrared.clone())
            .triage()
            .await
    }

    fn model(&self) -> Result<&Arc<dyn LanguageModel>> {
        self.model.as_ref().ok_or(ClueMeisterError::ModelUnavailable)
    }

    /// Extract clues from raw text via the model and store them
    pub async fn extract_clues(&self, raw_text: &str) -> Result<Vec<String>> {
        let model = self.model()?;
        let mut found: Vec<String> = Vec::new();

        for round in 0..self.extraction.max_rounds {
            if round > 0 {
                tokio::time::sleep(self.extraction.request_interval()).await;
            }

            let reply = model.generate(&prompts::extraction_prompt(raw_text, &found)).await?;
            if !prompts::has_clues(&reply) {
                break;
            }

            let before = found.len();
            for clue in prompts::parse_extracted(&reply) {
                if !found.contains(&clue) {
                    found.push(clue);
                }
            }
            if found.len() == before {
                break;
            }
        }

        for clue in &found {
            self.kb.add_clue(clue).await?;
        }

        tracing::info!("🔍 Extracted {} clues via {}", found.len(), model.name());

        Ok(found)
    }

    /// Let the model flag related clues; returns the number of markers
    pub async fn flag_clues(&self) -> Result<usize> {
        let model = self.model()?;
        let clue_text = self.clues_to_text().await?;

        let reply = model.generate(&prompts::flagging_prompt(&clue_text)).await?;
        let ids = prompts::parse_flagged(&reply);

        for id in &ids {
            match self.kb.add_clue_tag(*id, AI_FLAGGED_TAG).await {
                Ok(()) => {}
                Err(ClueMeisterError::ClueNotFound(id)) => {
                    tracing::warn!("Model flagged unknown clue {}", id);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(ids.len())
    }

    /// Group clues into clusters via the model; stored on the session
    pub async fn cluster_clues(&self, session: &mut ClueSession) -> Result<BTreeMap<u32, Vec<ClueId>>> {
        let model = self.model()?;
        let clues = self.kb.get_clues().await?;

        let reply = model.generate(&prompts::clustering_prompt(&clues)).await?;
        let clusters = prompts::parse_clusters(&reply);

        session.set_clusters(clusters.clone());
        tracing::info!("🗂️ Grouped clues into {} clusters", clusters.len());

        Ok(clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn agent() -> ClueMeister {
        ClueMeister::new(Arc::new(SqliteKnowledgeBase::new(":memory:").await.unwrap()))
    }

    #[tokio::test]
    async fn test_status_lifecycle() {
        let agent = agent().await;
        let mut session = ClueSession::new();

        let status = agent.process_request(&mut session, &json!({"get_status": true})).await;
        assert_eq!(status, ClueResponse::Status { status: "initialized".to_string() });

        agent.process_request(&mut session, &json!({"update_path": [[0, 0]]})).await;
        let status = agent.process_request(&mut session, &json!({"get_status": true})).await;
        assert_eq!(status, ClueResponse::Status { status: "path updated".to_string() });
    }

    #[tokio::test]
    async fn test_rank_without_path() {
        let agent = agent().await;
        let mut session = ClueSession::new();

        let response = agent.process_request(&mut session, &json!({"rank_clues": true})).await;
        assert_eq!(response, ClueResponse::error("Path is not set"));
    }

    #[tokio::test]
    async fn test_unknown_request() {
        let agent = agent().await;
        let mut session = ClueSession::new();

        let response = agent.process_request(&mut session, &json!({"launch_drone": true})).await;
        assert_eq!(response, ClueResponse::error("Unknown request type"));
    }

    #[tokio::test]
    async fn test_model_required() {
        let agent = agent().await;
        let mut session = ClueSession::new();

        let response = agent.process_request(&mut session, &json!({"flag_clues": true})).await;
        assert_eq!(response, ClueResponse::error("Language model is not configured"));
    }

    #[tokio::test]
    async fn test_clue_text() {
        let agent = agent().await;
        let first = agent.knowledge_base().add_clue("red hat at 1,2").await.unwrap();
        agent.knowledge_base().add_clue("footprint").await.unwrap();
        agent.knowledge_base().add_clue_tag(first, AI_FLAGGED_TAG).await.unwrap();

        let text = agent.clues_to_text().await.unwrap();
        assert_eq!(
            text,
            "Clues:\nClue ID #1: red hat at 1,2 (Already Flagged)\nClue ID #2: footprint\n"
        );
    }
}
