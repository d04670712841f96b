//! Ingestion pipeline: chunk a document and replace the index contents.

use crate::chunker;
use crate::index::IndexHandle;
use crate::types::IngestStats;
use chrono::Utc;
use doctalk_core::AppResult;
use std::sync::Arc;
use std::time::Instant;

/// Ties the chunker and the shared index together.
///
/// Each ingest defines the complete corpus: the previous index contents are
/// discarded at the swap. Incremental addition is deliberately not supported;
/// callers that want a larger corpus ingest the concatenated documents.
pub struct IngestionPipeline {
    index: Arc<IndexHandle>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl IngestionPipeline {
    pub fn new(index: Arc<IndexHandle>, chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            index,
            chunk_size,
            chunk_overlap,
        }
    }

    /// Chunk raw text and rebuild the index from the result.
    pub async fn ingest(&self, raw_text: &str) -> AppResult<IngestStats> {
        let started = Instant::now();

        let windows = chunker::chunk_text(raw_text, self.chunk_size, self.chunk_overlap)?;
        let chunks_count = self.index.rebuild(&windows).await? as u32;

        let stats = IngestStats {
            chunks_count,
            bytes_processed: raw_text.len() as u64,
            duration_secs: started.elapsed().as_secs_f64(),
            ingested_at: Utc::now(),
        };

        tracing::info!(
            "Ingested {} bytes into {} chunks in {:.2}s",
            stats.bytes_processed,
            stats.chunks_count,
            stats.duration_secs
        );

        Ok(stats)
    }
}
