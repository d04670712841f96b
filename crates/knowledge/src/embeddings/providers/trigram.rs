//! Trigram embedding provider using character trigram hashing.

use crate::embeddings::provider::EmbeddingProvider;
use doctalk_core::AppResult;
use std::collections::BTreeMap;

/// Common words excluded before hashing, for better discrimination.
const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them",
];

/// Trigram-based embedding provider for local, offline operation.
///
/// Hashes stop-word-filtered words and their character trigrams into a
/// fixed-dimension vector, normalized to unit length. Not semantically
/// accurate like a neural model, but deterministic and content-dependent,
/// which makes it the default provider and the test embedder.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
}

impl TrigramProvider {
    /// Create a new trigram provider with the given dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Generate a trigram-based embedding for text.
    fn generate_embedding(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0; self.dimensions];

        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split_whitespace()
            .filter(|w| !STOP_WORDS.contains(w) && w.len() > 2)
            .collect();

        // BTreeMap iterates in sorted order, keeping the floating-point
        // accumulation below reproducible
        let mut word_freq: BTreeMap<&str, u32> = BTreeMap::new();
        for word in &words {
            *word_freq.entry(word).or_insert(0) += 1;
        }

        for (word, freq) in &word_freq {
            let chars: Vec<char> = word.chars().collect();

            // Each character trigram contributes to one dimension, sqrt
            // scaled so frequent words do not dominate
            for trigram in chars.windows(3) {
                let dim = (hash_chars(trigram, 37) as usize) % self.dimensions;
                embedding[dim] += (*freq as f32).sqrt();
            }

            // The whole word contributes as well
            let dim = (hash_chars(&chars, 31) as usize) % self.dimensions;
            embedding[dim] += *freq as f32;
        }

        // Normalize to unit vector
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

fn hash_chars(chars: &[char], multiplier: u64) -> u64 {
    let mut buf = [0u8; 4];
    chars.iter().fold(0u64, |acc, c| {
        c.encode_utf8(&mut buf)
            .bytes()
            .fold(acc, |acc, b| acc.wrapping_mul(multiplier).wrapping_add(b as u64))
    })
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| self.generate_embedding(text))
            .collect())
    }
}
