//! In-memory vector index with brute-force cosine similarity search.

use crate::embeddings::EmbeddingProvider;
use crate::types::{Chunk, ScoredChunk};
use doctalk_core::{AppError, AppResult};
use std::sync::{Arc, RwLock};

/// An immutable snapshot of embedded chunks.
///
/// Built once from a set of chunk texts and never mutated afterwards; the
/// shared [`IndexHandle`] replaces whole snapshots on ingestion.
pub struct VectorIndex {
    entries: Vec<(Chunk, Vec<f32>)>,
}

impl VectorIndex {
    /// Build an index by embedding one chunk per text.
    pub async fn build(
        texts: &[String],
        embedder: &dyn EmbeddingProvider,
    ) -> AppResult<VectorIndex> {
        let embeddings = embedder.embed_batch(texts).await?;

        let entries = texts
            .iter()
            .zip(embeddings)
            .enumerate()
            .map(|(position, (text, embedding))| {
                (Chunk::new(text.clone(), position as u32), embedding)
            })
            .collect();

        Ok(Self { entries })
    }

    /// Number of chunks in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the `k` entries most similar to the query embedding, nearest
    /// first. Ties keep insertion order (stable sort). Fewer than `k`
    /// entries returns all of them.
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut results: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|(chunk, embedding)| ScoredChunk {
                chunk: chunk.clone(),
                score: cosine_similarity(query_embedding, embedding),
            })
            .collect();

        // Sort by score descending
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        // Take top-k
        results.truncate(k);

        results
    }
}

/// Shared handle to the current index and the embedding provider it uses.
///
/// Queries and index contents always go through the same provider instance,
/// so stored and query embeddings stay comparable. Rebuilds construct the
/// replacement entirely outside the lock, then swap the `Arc` under a short
/// write lock; searches snapshot the `Arc` under a short read lock and run
/// against the snapshot. In-flight searches see the old or the new index,
/// never a mix.
pub struct IndexHandle {
    embedder: Arc<dyn EmbeddingProvider>,
    current: RwLock<Arc<VectorIndex>>,
}

impl IndexHandle {
    /// Create a handle seeded with a single empty placeholder chunk.
    pub async fn new(embedder: Arc<dyn EmbeddingProvider>) -> AppResult<Self> {
        let seed = VectorIndex::build(&[String::new()], embedder.as_ref()).await?;

        Ok(Self {
            embedder,
            current: RwLock::new(Arc::new(seed)),
        })
    }

    /// Replace the entire index with one built from the given chunk texts.
    ///
    /// Returns the number of chunks in the new index.
    pub async fn rebuild(&self, texts: &[String]) -> AppResult<usize> {
        let index = VectorIndex::build(texts, self.embedder.as_ref()).await?;
        let count = index.len();

        {
            let mut current = self.current.write().unwrap();
            *current = Arc::new(index);
        }

        tracing::info!("Vector index replaced ({} chunks)", count);
        Ok(count)
    }

    /// Embed the query and return the top-k most similar chunks.
    pub async fn search(&self, query: &str, k: usize) -> AppResult<Vec<ScoredChunk>> {
        if k == 0 {
            return Err(AppError::Config(
                "Retrieval depth k must be greater than zero".to_string(),
            ));
        }

        let query_embedding = self.embedder.embed(query).await?;

        let snapshot = {
            let current = self.current.read().unwrap();
            Arc::clone(&current)
        };

        let results = snapshot.search(&query_embedding, k);

        tracing::debug!("Retrieved {} chunks (requested top-{})", results.len(), k);
        Ok(results)
    }

    /// Number of chunks currently indexed.
    pub fn len(&self) -> usize {
        self.current.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().unwrap().is_empty()
    }
}

/// Calculate cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::trigram::TrigramProvider;

    fn test_embedder() -> Arc<dyn EmbeddingProvider> {
        Arc::new(TrigramProvider::new(384))
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![1.0, 0.0, 0.0];
        let d = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&c, &d) - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_mismatched_lengths() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[tokio::test]
    async fn test_new_handle_is_seeded_with_placeholder() {
        let handle = IndexHandle::new(test_embedder()).await.unwrap();
        assert_eq!(handle.len(), 1);

        let results = handle.search("anything", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.text, "");
    }

    #[tokio::test]
    async fn test_exact_match_ranks_first() {
        let handle = IndexHandle::new(test_embedder()).await.unwrap();
        handle
            .rebuild(&texts(&[
                "Paris is the capital of France.",
                "Berlin is the capital of Germany.",
                "Mitochondria are the powerhouse of the cell.",
            ]))
            .await
            .unwrap();

        let results = handle
            .search("Paris is the capital of France.", 3)
            .await
            .unwrap();

        assert_eq!(results[0].chunk.text, "Paris is the capital of France.");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_search_returns_min_of_k_and_size() {
        let handle = IndexHandle::new(test_embedder()).await.unwrap();
        handle
            .rebuild(&texts(&["one fish", "two fish", "red fish"]))
            .await
            .unwrap();

        assert_eq!(handle.search("fish", 10).await.unwrap().len(), 3);
        assert_eq!(handle.search("fish", 2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_zero_k_is_config_error() {
        let handle = IndexHandle::new(test_embedder()).await.unwrap();
        let err = handle.search("query", 0).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_rebuild_replaces_previous_corpus() {
        let handle = IndexHandle::new(test_embedder()).await.unwrap();

        handle
            .rebuild(&texts(&["The access code is 9137."]))
            .await
            .unwrap();
        let results = handle.search("access code", 5).await.unwrap();
        assert!(results.iter().any(|r| r.chunk.text.contains("9137")));

        handle
            .rebuild(&texts(&["The weather in Lisbon is mild."]))
            .await
            .unwrap();
        assert_eq!(handle.len(), 1);

        let results = handle.search("access code", 5).await.unwrap();
        assert!(!results.iter().any(|r| r.chunk.text.contains("9137")));
    }

    #[tokio::test]
    async fn test_rebuild_is_deterministic() {
        let corpus = texts(&["alpha particle", "beta decay", "gamma radiation"]);

        let handle = IndexHandle::new(test_embedder()).await.unwrap();
        handle.rebuild(&corpus).await.unwrap();
        let first: Vec<(String, f32)> = handle
            .search("radiation", 3)
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.chunk.text, r.score))
            .collect();

        handle.rebuild(&corpus).await.unwrap();
        let second: Vec<(String, f32)> = handle
            .search("radiation", 3)
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.chunk.text, r.score))
            .collect();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_tied_scores_keep_insertion_order() {
        let handle = IndexHandle::new(test_embedder()).await.unwrap();
        handle
            .rebuild(&texts(&["identical text", "identical text"]))
            .await
            .unwrap();

        let results = handle.search("identical text", 2).await.unwrap();
        assert_eq!(results[0].chunk.position, 0);
        assert_eq!(results[1].chunk.position, 1);
    }
}
