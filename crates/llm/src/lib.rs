//! LLM client abstractions and provider implementations for doctalk.
//!
//! Exposes a provider-agnostic [`LlmClient`] trait with Gemini and Ollama
//! backends, plus a factory that picks the implementation from configuration.

pub mod client;
pub mod factory;
pub mod providers;

pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{GeminiClient, OllamaClient};
