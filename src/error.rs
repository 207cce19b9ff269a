use thiserror::Error;

use crate::core::ClueId;

/// Main error type for the clue meister agent
#[derive(Error, Debug)]
pub enum ClueMeisterError {
    /// Ranking requested before a rescue path was set
    #[error("Path is not set")]
    PathNotSet,

    /// Message shape not recognised by the dispatcher
    #[error("Unknown request type")]
    UnknownRequest,

    /// Clue id absent from the knowledge base
    #[error("Clue {0} not found")]
    ClueNotFound(ClueId),

    /// LLM-backed request on an agent without a model
    #[error("Language model is not configured")]
    ModelUnavailable,

    /// Language model API errors
    #[error("Language model error: {0}")]
    Model(String),

    /// Knowledge base errors
    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML config errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<String> for ClueMeisterError {
    fn from(s: String) -> Self {
        ClueMeisterError::Other(s)
    }
}

impl From<&str> for ClueMeisterError {
    fn from(s: &str) -> Self {
        ClueMeisterError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ClueMeisterError>;
