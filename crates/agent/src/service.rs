//! Composition root for the question-answering service.

use crate::engine::{AgentTurn, ReasoningAgent};
use crate::memory::ConversationMemory;
use crate::tools::{CalculatorTool, ToolRegistry};
use doctalk_core::{AppConfig, AppResult};
use doctalk_knowledge::{
    create_provider, EmbeddingConfig, IndexHandle, IngestStats, IngestionPipeline,
};
use std::sync::Arc;

/// Everything one question-answering session needs, constructed once at
/// startup and shared by handle.
///
/// Methods take `&self` and are safe to call from concurrent tasks: the
/// index swaps snapshots behind its lock, the memory serializes appends
/// behind a mutex, and the rest is immutable after construction.
pub struct AgentService {
    index: Arc<IndexHandle>,
    pipeline: IngestionPipeline,
    memory: ConversationMemory,
    tools: ToolRegistry,
    agent: ReasoningAgent,
    retrieve_k: usize,
}

impl AgentService {
    pub fn new(
        index: Arc<IndexHandle>,
        pipeline: IngestionPipeline,
        memory: ConversationMemory,
        tools: ToolRegistry,
        agent: ReasoningAgent,
        retrieve_k: usize,
    ) -> Self {
        Self {
            index,
            pipeline,
            memory,
            tools,
            agent,
            retrieve_k,
        }
    }

    /// Assemble the full service from validated configuration.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let embedder = create_provider(&EmbeddingConfig {
            provider: config.embedding_provider.clone(),
            model: config.embedding_model.clone(),
            dimensions: config.embedding_dimensions,
            endpoint: None,
        })?;

        let index = Arc::new(IndexHandle::new(embedder).await?);
        let pipeline = IngestionPipeline::new(
            Arc::clone(&index),
            config.chunk_size,
            config.chunk_overlap,
        );

        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(CalculatorTool))?;

        let client = doctalk_llm::create_client(
            &config.provider,
            config.endpoint.as_deref(),
            config.api_key.as_deref(),
        )?;
        let agent = ReasoningAgent::new(client, &config.model, config.max_iterations);

        Ok(Self::new(
            index,
            pipeline,
            ConversationMemory::new(config.memory_max_turns),
            tools,
            agent,
            config.retrieve_k,
        ))
    }

    /// Replace the document corpus with the given text.
    pub async fn ingest_text(&self, raw_text: &str) -> AppResult<IngestStats> {
        self.pipeline.ingest(raw_text).await
    }

    /// Answer a question using retrieved context and the reasoning loop.
    pub async fn chat(&self, question: &str) -> AppResult<AgentTurn> {
        let retrieved = self.index.search(question, self.retrieve_k).await?;
        let context = retrieved
            .iter()
            .map(|r| r.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        tracing::debug!("Built context from {} retrieved chunks", retrieved.len());

        self.agent
            .run(question, &context, &self.tools, &self.memory)
            .await
    }

    /// Retrieve chunks for a question without running the reasoning loop.
    pub async fn search(&self, query: &str, k: usize) -> AppResult<Vec<doctalk_knowledge::ScoredChunk>> {
        self.index.search(query, k).await
    }

    /// The conversation recorded so far.
    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Number of chunks currently indexed.
    pub fn indexed_chunks(&self) -> usize {
        self.index.len()
    }
}
