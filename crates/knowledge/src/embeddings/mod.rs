//! Embedding generation for knowledge chunks.
//!
//! Provider-agnostic embedding behind the [`EmbeddingProvider`] trait, with a
//! deterministic local trigram provider (the default) and an Ollama-backed
//! provider for neural embeddings.

pub mod config;
pub mod provider;
pub mod providers;

pub use config::EmbeddingConfig;
pub use provider::{create_provider, EmbeddingProvider};
