//! Configuration management for doctalk.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - Config file (doctalk.yaml)
//! - Environment variables
//! - Command-line flags

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Main application configuration.
///
/// This struct holds all global configuration options that affect
/// behavior across commands: the model backend, the embedding provider,
/// chunking geometry, retrieval depth, and the reasoning loop budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// LLM backend provider ("gemini" or "ollama")
    pub provider: String,

    /// Model identifier for the backend
    pub model: String,

    /// Custom backend endpoint URL
    pub endpoint: Option<String>,

    /// API key for the backend (Gemini requires one)
    pub api_key: Option<String>,

    /// Embedding provider ("trigram" or "ollama")
    pub embedding_provider: String,

    /// Embedding model identifier
    pub embedding_model: String,

    /// Embedding vector dimensions
    pub embedding_dimensions: usize,

    /// Chunk window size in characters
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,

    /// Number of chunks retrieved as context per question
    pub retrieve_k: usize,

    /// Maximum reasoning loop iterations per question
    pub max_iterations: usize,

    /// Cap on remembered conversation turns; `None` keeps every turn
    pub memory_max_turns: Option<usize>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_retrieve_k() -> usize {
    3
}

fn default_max_iterations() -> usize {
    15
}

fn default_embedding_dimensions() -> usize {
    384
}

/// Full configuration file structure (doctalk.yaml).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    embedding: Option<EmbeddingSection>,
    chunking: Option<ChunkingSection>,
    retrieval: Option<RetrievalSection>,
    agent: Option<AgentSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmbeddingSection {
    provider: Option<String>,
    model: Option<String>,
    dimensions: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChunkingSection {
    #[serde(rename = "chunkSize")]
    chunk_size: Option<usize>,

    #[serde(rename = "chunkOverlap")]
    chunk_overlap: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RetrievalSection {
    #[serde(rename = "topK")]
    top_k: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AgentSection {
    #[serde(rename = "maxIterations")]
    max_iterations: Option<usize>,

    #[serde(rename = "memoryMaxTurns")]
    memory_max_turns: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash-001".to_string(),
            endpoint: None,
            api_key: None,
            embedding_provider: "trigram".to_string(),
            embedding_model: "trigram-v1".to_string(),
            embedding_dimensions: default_embedding_dimensions(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            retrieve_k: default_retrieve_k(),
            max_iterations: default_max_iterations(),
            memory_max_turns: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// The config file is resolved in precedence order: the `--config` flag
    /// (`config_override`), then `DOCTALK_CONFIG`, then `./doctalk.yaml`. An
    /// explicitly named file that does not exist is a configuration error;
    /// only the implicit default may be absent.
    ///
    /// Environment variables:
    /// - `DOCTALK_CONFIG`: Path to config file (default: ./doctalk.yaml)
    /// - `DOCTALK_PROVIDER`: LLM backend provider
    /// - `DOCTALK_MODEL`: Model identifier
    /// - `DOCTALK_ENDPOINT`: Custom backend endpoint
    /// - `GOOGLE_API_KEY`: API key for the Gemini backend
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load(config_override: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        let explicit = config_override
            .or_else(|| std::env::var("DOCTALK_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Config file {:?} does not exist",
                    path
                )));
            }
            config = config.merge_yaml(&path)?;
            config.config_file = Some(path);
        } else {
            let default_path = PathBuf::from("doctalk.yaml");
            if default_path.exists() {
                config = config.merge_yaml(&default_path)?;
            }
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("DOCTALK_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("DOCTALK_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("DOCTALK_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        config.api_key = std::env::var("GOOGLE_API_KEY").ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if let Some(endpoint) = llm.endpoint {
                result.endpoint = Some(endpoint);
            }
        }

        if let Some(embedding) = config_file.embedding {
            if let Some(provider) = embedding.provider {
                result.embedding_provider = provider;
            }
            if let Some(model) = embedding.model {
                result.embedding_model = model;
            }
            if let Some(dimensions) = embedding.dimensions {
                result.embedding_dimensions = dimensions;
            }
        }

        if let Some(chunking) = config_file.chunking {
            if let Some(chunk_size) = chunking.chunk_size {
                result.chunk_size = chunk_size;
            }
            if let Some(chunk_overlap) = chunking.chunk_overlap {
                result.chunk_overlap = chunk_overlap;
            }
        }

        if let Some(retrieval) = config_file.retrieval {
            if let Some(top_k) = retrieval.top_k {
                result.retrieve_k = top_k;
            }
        }

        if let Some(agent) = config_file.agent {
            if let Some(max_iterations) = agent.max_iterations {
                result.max_iterations = max_iterations;
            }
            if let Some(memory_max_turns) = agent.memory_max_turns {
                result.memory_max_turns = Some(memory_max_turns);
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables. The
    /// `--config` flag is not an override: it names the file `load` reads.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        endpoint: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(endpoint) = endpoint {
            self.endpoint = Some(endpoint);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate configuration before any component is constructed.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["gemini", "ollama"];
        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        if self.provider == "gemini" && self.api_key.is_none() {
            return Err(AppError::Config(
                "GOOGLE_API_KEY environment variable is not set".to_string(),
            ));
        }

        let known_embedding_providers = ["trigram", "ollama"];
        if !known_embedding_providers.contains(&self.embedding_provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding_provider,
                known_embedding_providers.join(", ")
            )));
        }

        if self.embedding_dimensions == 0 {
            return Err(AppError::Config(
                "embedding dimensions must be at least 1".to_string(),
            ));
        }

        if self.chunk_size == 0 {
            return Err(AppError::Config("chunkSize must be at least 1".to_string()));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(AppError::Config(format!(
                "chunkOverlap ({}) must be smaller than chunkSize ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        if self.retrieve_k == 0 {
            return Err(AppError::Config("topK must be at least 1".to_string()));
        }

        if self.max_iterations == 0 {
            return Err(AppError::Config(
                "maxIterations must be at least 1".to_string(),
            ));
        }

        if self.memory_max_turns == Some(0) {
            return Err(AppError::Config(
                "memoryMaxTurns must be at least 1 when set".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.model, "gemini-2.0-flash-001");
        assert_eq!(config.embedding_provider, "trigram");
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
        assert_eq!(config.retrieve_k, 3);
        assert_eq!(config.max_iterations, 15);
        assert_eq!(config.memory_max_turns, None);
        assert!(!config.verbose);
        assert!(!config.no_color);
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            Some("ollama".to_string()),
            Some("llama3.2".to_string()),
            Some("http://localhost:11434".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(overridden.provider, "ollama");
        assert_eq!(overridden.model, "llama3.2");
        assert_eq!(
            overridden.endpoint,
            Some("http://localhost:11434".to_string())
        );
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_parse_config_file() {
        let yaml = r#"
llm:
  provider: ollama
  model: llama3.2
chunking:
  chunkSize: 500
  chunkOverlap: 50
retrieval:
  topK: 5
agent:
  maxIterations: 8
  memoryMaxTurns: 40
logging:
  level: debug
  color: false
"#;
        let parsed: ConfigFile = serde_yaml::from_str(yaml).unwrap();

        let llm = parsed.llm.unwrap();
        assert_eq!(llm.provider.as_deref(), Some("ollama"));
        let chunking = parsed.chunking.unwrap();
        assert_eq!(chunking.chunk_size, Some(500));
        assert_eq!(chunking.chunk_overlap, Some(50));
        let agent = parsed.agent.unwrap();
        assert_eq!(agent.max_iterations, Some(8));
        assert_eq!(agent.memory_max_turns, Some(40));
        assert_eq!(parsed.retrieval.unwrap().top_k, Some(5));
        assert_eq!(parsed.logging.unwrap().color, Some(false));
    }

    #[test]
    fn test_load_reads_flag_supplied_config_file() {
        use std::io::Write;

        let mut file = tempfile::Builder::new()
            .prefix("doctalk")
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        write!(file, "retrieval:\n  topK: 7\nchunking:\n  chunkSize: 600\n").unwrap();
        file.flush().unwrap();

        let config = AppConfig::load(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.retrieve_k, 7);
        assert_eq!(config.chunk_size, 600);
        assert_eq!(config.config_file.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_load_rejects_missing_explicit_config_file() {
        let err = AppConfig::load(Some(PathBuf::from("/nonexistent/doctalk.yaml"))).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_gemini_requires_api_key() {
        let mut config = AppConfig::default();
        config.provider = "gemini".to_string();
        config.api_key = None;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));

        config.api_key = Some("test-key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_ollama_needs_no_key() {
        let mut config = AppConfig::default();
        config.provider = "ollama".to_string();
        config.api_key = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_overlap_bounds() {
        let mut config = AppConfig::default();
        config.api_key = Some("test-key".to_string());

        config.chunk_overlap = config.chunk_size;
        assert!(config.validate().is_err());

        config.chunk_overlap = config.chunk_size + 100;
        assert!(config.validate().is_err());

        config.chunk_overlap = config.chunk_size - 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_bounds() {
        let mut config = AppConfig::default();
        config.api_key = Some("test-key".to_string());

        config.retrieve_k = 0;
        assert!(config.validate().is_err());
        config.retrieve_k = 3;

        config.max_iterations = 0;
        assert!(config.validate().is_err());
        config.max_iterations = 15;

        config.memory_max_turns = Some(0);
        assert!(config.validate().is_err());
        config.memory_max_turns = Some(10);
        assert!(config.validate().is_ok());
    }
}
