//! Embedding provider configuration.

use serde::{Deserialize, Serialize};

/// Configuration for an embedding provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider name ("trigram" or "ollama")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Base URL override for remote providers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
            endpoint: None,
        }
    }
}
