//! Knowledge system type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bounded segment of source text, stored and embedded independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk identifier
    pub id: String,

    /// Text content
    pub text: String,

    /// Position within the source document
    pub position: u32,
}

impl Chunk {
    /// Create a chunk with a fresh UUID.
    pub fn new(text: impl Into<String>, position: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            position,
        }
    }
}

/// A chunk paired with its similarity score from a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The retrieved chunk
    pub chunk: Chunk,

    /// Cosine similarity against the query embedding
    pub score: f32,
}

/// Statistics from an ingest operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestStats {
    /// Number of chunks created
    pub chunks_count: u32,

    /// Total bytes processed
    pub bytes_processed: u64,

    /// Duration in seconds
    pub duration_secs: f64,

    /// When the corpus was ingested
    pub ingested_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_ids_are_unique() {
        let a = Chunk::new("same text", 0);
        let b = Chunk::new("same text", 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_chunk_serialization() {
        let chunk = Chunk::new("hello", 3);
        let json = serde_json::to_string(&chunk).unwrap();
        let parsed: Chunk = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.text, "hello");
        assert_eq!(parsed.position, 3);
        assert_eq!(parsed.id, chunk.id);
    }
}
