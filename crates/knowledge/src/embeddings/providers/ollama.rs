//! Neural embeddings through a local Ollama daemon.
//!
//! Talks to `/api/embeddings`, which takes one prompt per request, so a
//! batch turns into sequential calls. Transient failures retry with
//! exponential backoff before giving up.

use crate::embeddings::config::EmbeddingConfig;
use crate::embeddings::provider::EmbeddingProvider;
use doctalk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 100;
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Debug)]
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl OllamaProvider {
    pub fn new(config: &EmbeddingConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Knowledge(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config
                .endpoint
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            model: config.model.clone(),
            dimensions: config.dimensions,
        })
    }

    async fn embed_with_retries(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut backoff = Duration::from_millis(INITIAL_BACKOFF_MS);

        for attempt in 1..=MAX_ATTEMPTS {
            match self.embed_once(text).await {
                Ok(vector) => return Ok(vector),
                Err(e) if attempt == MAX_ATTEMPTS => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        "Embedding attempt {}/{} failed ({}), retrying in {:?}",
                        attempt,
                        MAX_ATTEMPTS,
                        e,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }
        }

        unreachable!("retry loop returns on the final attempt")
    }

    async fn embed_once(&self, text: &str) -> AppResult<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&EmbeddingRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|e| AppError::Knowledge(format!("Ollama is unreachable at {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Knowledge(format!(
                "Ollama embeddings API error ({}): {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Knowledge(format!("Malformed embeddings response: {}", e)))?;

        if parsed.embedding.len() != self.dimensions {
            return Err(AppError::Knowledge(format!(
                "Model '{}' returned {} dimensions, configured for {}",
                self.model,
                parsed.embedding.len(),
                self.dimensions
            )));
        }

        Ok(parsed.embedding)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        tracing::debug!("Embedding batch of {} texts via Ollama", texts.len());

        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            if text.trim().is_empty() {
                // The placeholder seed chunk and blank windows embed as the
                // zero vector without a round trip
                vectors.push(vec![0.0; self.dimensions]);
            } else {
                vectors.push(self.embed_with_retries(text).await?);
            }
        }

        Ok(vectors)
    }
}
