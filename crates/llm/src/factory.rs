//! Factory for creating LLM clients based on configuration.

use crate::client::LlmClient;
use crate::providers::{GeminiClient, OllamaClient};
use doctalk_core::{AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client for the given provider.
///
/// `endpoint` overrides the provider's default base URL when set. Gemini
/// requires an API key; Ollama ignores it.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    tracing::debug!("Creating LLM client for provider: {}", provider);

    match provider {
        "gemini" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config("GOOGLE_API_KEY environment variable is not set".to_string())
            })?;
            let client = match endpoint {
                Some(url) => GeminiClient::with_base_url(url, api_key),
                None => GeminiClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        "ollama" => {
            let client = match endpoint {
                Some(url) => OllamaClient::with_base_url(url),
                None => OllamaClient::new(),
            };
            Ok(Arc::new(client))
        }
        other => Err(AppError::Config(format!(
            "Unknown LLM provider: {}. Supported providers: gemini, ollama",
            other
        ))),
    }
}
