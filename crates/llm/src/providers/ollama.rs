//! Ollama backend, for running the agent against a local model.
//!
//! Uses the `/api/generate` endpoint with streaming disabled; the reasoning
//! loop only ever needs the finished completion.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use doctalk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Wire format for `/api/generate`.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    model: String,
    response: String,

    #[serde(default)]
    prompt_eval_count: u32,

    #[serde(default)]
    eval_count: u32,
}

pub struct OllamaClient {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Point at the local daemon on the default port.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn build_request<'a>(&self, request: &'a LlmRequest) -> GenerateRequest<'a> {
        let options = (request.temperature.is_some() || request.max_tokens.is_some()).then(|| {
            GenerateOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            }
        });

        GenerateRequest {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            system: request.system.as_deref(),
            options,
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::debug!(
            "Ollama completion: model {}, prompt {} bytes",
            request.model,
            request.prompt.len()
        );

        let url = format!("{}/api/generate", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&self.build_request(request))
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("Ollama is unreachable at {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Backend(format!(
                "Ollama API error ({}): {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Backend(format!("Malformed Ollama response: {}", e)))?;

        Ok(LlmResponse {
            content: generated.response,
            model: generated.model,
            usage: LlmUsage::new(generated.prompt_eval_count, generated.eval_count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        assert_eq!(OllamaClient::new().base_url, DEFAULT_BASE_URL);
        assert_eq!(
            OllamaClient::with_base_url("http://remote:11434/").base_url,
            "http://remote:11434"
        );
    }

    #[test]
    fn test_request_wire_format() {
        let client = OllamaClient::new();
        let request = LlmRequest::new("Hello", "llama3.2")
            .with_temperature(0.0)
            .with_max_tokens(100);

        let wire = serde_json::to_value(client.build_request(&request)).unwrap();
        assert_eq!(wire["model"], "llama3.2");
        assert_eq!(wire["prompt"], "Hello");
        assert_eq!(wire["stream"], false);
        assert_eq!(wire["options"]["temperature"], 0.0);
        assert_eq!(wire["options"]["num_predict"], 100);
    }

    #[test]
    fn test_request_omits_options_when_unset() {
        let client = OllamaClient::new();
        let wire = serde_json::to_value(client.build_request(&LlmRequest::new("hi", "llama3.2")))
            .unwrap();
        assert!(wire.get("options").is_none());
        assert!(wire.get("system").is_none());
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "model": "llama3.2",
            "response": "Final Answer: hello",
            "done": true,
            "prompt_eval_count": 8,
            "eval_count": 4
        }"#;

        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.response, "Final Answer: hello");
        assert_eq!(parsed.prompt_eval_count + parsed.eval_count, 12);
    }
}
