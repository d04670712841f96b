//! Knowledge layer for doctalk: chunking, embeddings, and the in-memory
//! vector index that backs retrieval.

pub mod chunker;
pub mod embeddings;
pub mod index;
pub mod ingest;
pub mod types;

pub use embeddings::{create_provider, EmbeddingConfig, EmbeddingProvider};
pub use index::{IndexHandle, VectorIndex};
pub use ingest::IngestionPipeline;
pub use types::{Chunk, IngestStats, ScoredChunk};
