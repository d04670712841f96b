//! The embedding contract and provider factory.

use crate::embeddings::config::EmbeddingConfig;
use doctalk_core::{AppError, AppResult};
use std::sync::Arc;

/// Maps text to fixed-dimension vectors.
///
/// Implementations must be deterministic and stateless per call: identical
/// input always yields the same vector, and the same instance may embed from
/// ingestion and search concurrently. The index relies on both to keep
/// stored and query embeddings comparable.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    fn provider_name(&self) -> &str;

    fn model_name(&self) -> &str;

    /// Length of every vector this provider produces.
    fn dimensions(&self) -> usize;

    /// Embed a batch of texts, one vector per input, in input order.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Embed one text.
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| AppError::Knowledge("Provider returned no embedding".to_string()))
    }
}

/// Build the provider named by the configuration.
pub fn create_provider(config: &EmbeddingConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    tracing::debug!(
        "Embedding provider: {} ({}, {} dims)",
        config.provider,
        config.model,
        config.dimensions
    );

    match config.provider.as_str() {
        "trigram" => Ok(Arc::new(super::providers::trigram::TrigramProvider::new(
            config.dimensions,
        ))),
        "ollama" => Ok(Arc::new(super::providers::ollama::OllamaProvider::new(
            config,
        )?)),
        other => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: trigram, ollama",
            other
        ))),
    }
}
