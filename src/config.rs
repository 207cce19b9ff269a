use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, ClueMeisterError};
use crate::ranking::RankingMethod;

const DB_ENV: &str = "CLUE_MEISTER_DB";
const API_KEY_ENV: &str = "GOOGLE_API_KEY";
const MODEL_ENV: &str = "CLUE_MEISTER_MODEL";
const PORT_ENV: &str = "PORT";

/// Agent configuration, loaded from YAML with environment overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClueMeisterConfig {
    pub database: DatabaseConfig,
    pub model: ModelConfig,
    pub ranking: RankingConfig,
    pub extraction: ExtractionConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "clue_meister.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model id, e.g. `gemini-1.5-flash`
    pub name: String,
    pub base_url: String,
    /// No key means LLM-backed requests are rejected
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub method: RankingMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Upper bound on model round-trips per extraction
    pub max_rounds: usize,
    /// Pause between model round-trips
    pub request_interval_ms: u64,
}

impl ExtractionConfig {
    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_rounds: 5,
            request_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8090 }
    }
}

impl ClueMeisterConfig {
    /// Parse YAML config text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from an optional YAML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let yaml = std::fs::read_to_string(path).map_err(|e| {
                    ClueMeisterError::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::from_yaml(&yaml)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(DB_ENV) {
            self.database.path = path;
        }
        if let Some(key) = lookup(API_KEY_ENV) {
            self.model.api_key = Some(key);
        }
        if let Some(name) = lookup(MODEL_ENV) {
            self.model.name = name;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port
                .parse()
                .map_err(|_| ClueMeisterError::Config(format!("invalid {}: {}", PORT_ENV, port)))?;
        }

        if self.extraction.max_rounds == 0 {
            return Err(ClueMeisterError::Config("extraction.max_rounds must be at least 1".to_string()));
        }

        Ok(())
    }
}
