//! Google Gemini LLM provider implementation.
//!
//! Talks to the Generative Language API's `generateContent` endpoint.
//! API reference: https://ai.google.dev/api/generate-content

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use doctalk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini API request format.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,

    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,

    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Gemini API response format.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,

    #[serde(rename = "usageMetadata", default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u32,

    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u32,
}

/// Gemini LLM client.
pub struct GeminiClient {
    /// Base URL for the Generative Language API
    base_url: String,

    /// API key sent in the x-goog-api-key header
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client with the default API endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create a new Gemini client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Convert LlmRequest to Gemini format.
    fn to_gemini_request(&self, request: &LlmRequest) -> GeminiRequest {
        let generation_config = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            })
        } else {
            None
        };

        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: request.prompt.clone(),
                }],
            }],
            system_instruction: request.system.as_ref().map(|system| GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: system.clone(),
                }],
            }),
            generation_config,
        }
    }

    /// Convert a Gemini response to LlmResponse.
    fn convert_response(&self, model: &str, response: GeminiResponse) -> AppResult<LlmResponse> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Backend("Gemini returned no candidates".to_string()))?;

        let content = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        let usage = response
            .usage_metadata
            .map(|meta| LlmUsage::new(meta.prompt_token_count, meta.candidates_token_count))
            .unwrap_or_default();

        Ok(LlmResponse {
            content,
            model: model.to_string(),
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending completion request to Gemini");
        tracing::debug!("Model: {}, prompt: {} bytes", request.model, request.prompt.len());

        let gemini_request = self.to_gemini_request(request);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, request.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("Failed to send request to Gemini: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Backend(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AppError::Backend(format!("Failed to parse Gemini response: {}", e)))?;

        tracing::info!("Received completion from Gemini");

        self.convert_response(&request.model, gemini_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_client_creation() {
        let client = GeminiClient::new("test-key");
        assert_eq!(client.provider_name(), "gemini");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);

        let client = GeminiClient::with_base_url("http://localhost:9090/", "test-key");
        assert_eq!(client.base_url, "http://localhost:9090");
    }

    #[test]
    fn test_gemini_request_conversion() {
        let client = GeminiClient::new("test-key");
        let request = LlmRequest::new("What is 2 + 2?", "gemini-2.0-flash-001")
            .with_temperature(0.0)
            .with_system("You are a helpful AI assistant.");

        let gemini_req = client.to_gemini_request(&request);
        assert_eq!(gemini_req.contents.len(), 1);
        assert_eq!(gemini_req.contents[0].role.as_deref(), Some("user"));
        assert_eq!(gemini_req.contents[0].parts[0].text, "What is 2 + 2?");
        assert!(gemini_req.system_instruction.is_some());

        let config = gemini_req.generation_config.unwrap();
        assert_eq!(config.temperature, Some(0.0));
        assert_eq!(config.max_output_tokens, None);
    }

    #[test]
    fn test_gemini_request_omits_empty_generation_config() {
        let client = GeminiClient::new("test-key");
        let request = LlmRequest::new("Hello", "gemini-2.0-flash-001");

        let gemini_req = client.to_gemini_request(&request);
        assert!(gemini_req.generation_config.is_none());

        let json = serde_json::to_string(&gemini_req).unwrap();
        assert!(!json.contains("generationConfig"));
        assert!(!json.contains("systemInstruction"));
    }

    #[test]
    fn test_gemini_response_parsing() {
        let body = r#"{
            "candidates": [
                {
                    "content": {
                        "role": "model",
                        "parts": [{"text": "Final Answer: 4"}]
                    }
                }
            ],
            "usageMetadata": {
                "promptTokenCount": 12,
                "candidatesTokenCount": 5,
                "totalTokenCount": 17
            }
        }"#;

        let parsed: GeminiResponse = serde_json::from_str(body).unwrap();
        let client = GeminiClient::new("test-key");
        let response = client
            .convert_response("gemini-2.0-flash-001", parsed)
            .unwrap();

        assert_eq!(response.content, "Final Answer: 4");
        assert_eq!(response.model, "gemini-2.0-flash-001");
        assert_eq!(response.usage.prompt_tokens, 12);
        assert_eq!(response.usage.completion_tokens, 5);
        assert_eq!(response.usage.total_tokens, 17);
    }

    #[test]
    fn test_gemini_response_without_candidates_is_backend_error() {
        let parsed: GeminiResponse = serde_json::from_str("{}").unwrap();
        let client = GeminiClient::new("test-key");
        let err = client
            .convert_response("gemini-2.0-flash-001", parsed)
            .unwrap_err();
        assert!(matches!(err, AppError::Backend(_)));
    }
}
