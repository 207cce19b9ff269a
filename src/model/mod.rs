pub mod gemini;
pub mod prompts;

use async_trait::async_trait;

use crate::error::Result;

pub use gemini::GeminiModel;

/// Trait for generative language model backends
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a text completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get model name for logging
    fn name(&self) -> &str;
}
