//! The model-backend contract: one non-streaming completion call.

use doctalk_core::AppResult;
use serde::{Deserialize, Serialize};

/// A single completion request.
///
/// The reasoning loop always pins `temperature` to zero; the field exists so
/// other callers (and tests) can choose otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    /// Full prompt text, including any accumulated transcript
    pub prompt: String,

    /// Model identifier, e.g. "gemini-2.0-flash-001" or "llama3.2"
    pub model: String,

    /// Sampling temperature; backends fall back to their default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Completion length cap in tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// System instructions sent out of band from the prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            temperature: None,
            max_tokens: None,
            system: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// A completed response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Generated text
    pub content: String,

    /// Model that produced it
    pub model: String,

    /// Token accounting, zeroed when the backend reports none
    pub usage: LlmUsage,
}

/// Token counts as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmUsage {
    #[serde(default)]
    pub prompt_tokens: u32,

    #[serde(default)]
    pub completion_tokens: u32,

    #[serde(default)]
    pub total_tokens: u32,
}

impl LlmUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// A language-model backend.
///
/// Implementations are Gemini, Ollama, and scripted doubles in tests. A
/// backend that is unreachable or rejects the request fails with
/// `AppError::Backend`; the core never retries.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider name for logs and diagnostics ("gemini", "ollama").
    fn provider_name(&self) -> &str;

    /// Run one completion to the end and return the full response.
    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse>;
}

impl std::fmt::Debug for dyn LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("provider", &self.provider_name())
            .finish()
    }
}
