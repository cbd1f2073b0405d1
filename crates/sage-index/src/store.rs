//! In-memory vector store with cosine-similarity search.

use std::cmp::Ordering;

use sage_core::{Error, Result};

use crate::artifact::{CorpusArtifacts, DocumentChunk};

/// A chunk returned from a similarity search, with its score.
#[derive(Debug, Clone)]
pub struct ScoredChunk<'store> {
    /// The matched chunk.
    pub chunk: &'store DocumentChunk,
    /// Cosine similarity to the query (higher is more relevant).
    pub score: f32,
}

/// Immutable in-memory vector store over the corpus chunks.
///
/// Chunks and embeddings are parallel vectors; nothing mutates them after
/// construction, so the store can be shared read-only across sessions.
#[derive(Debug, Default)]
pub struct VectorStore {
    chunks: Vec<DocumentChunk>,
    embeddings: Vec<Vec<f32>>,
}

impl VectorStore {
    /// Builds a store from loaded artifacts.
    ///
    /// # Errors
    ///
    /// Returns an error if chunk and embedding counts disagree.
    pub fn from_artifacts(artifacts: CorpusArtifacts) -> Result<Self> {
        if artifacts.chunks.len() != artifacts.embeddings.len() {
            return Err(Error::IndexCorrupt(format!(
                "chunk count ({}) does not match embedding count ({})",
                artifacts.chunks.len(),
                artifacts.embeddings.len()
            )));
        }

        Ok(Self {
            chunks: artifacts.chunks,
            embeddings: artifacts.embeddings,
        })
    }

    /// Returns the `top_k` most similar chunks, most relevant first.
    ///
    /// Ties keep store order, which is unspecified but stable for a loaded
    /// index.
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Vec<ScoredChunk<'_>> {
        let mut scored: Vec<(usize, f32)> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(index, embedding)| (index, cosine_similarity(query_embedding, embedding)))
            .collect();

        scored.sort_by(|first, second| {
            second.1.partial_cmp(&first.1).unwrap_or(Ordering::Equal)
        });

        scored
            .into_iter()
            .take(top_k)
            .map(|(index, score)| ScoredChunk {
                chunk: &self.chunks[index],
                score,
            })
            .collect()
    }

    /// All chunks in store order.
    pub fn chunks(&self) -> &[DocumentChunk] {
        &self.chunks
    }

    /// Number of stored chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Calculate cosine similarity between two vectors.
fn cosine_similarity(vector_a: &[f32], vector_b: &[f32]) -> f32 {
    if vector_a.len() != vector_b.len() {
        return 0.0;
    }

    let dot_product: f32 = vector_a
        .iter()
        .zip(vector_b.iter())
        .map(|(x, y)| x * y)
        .sum();
    let magnitude_a = vector_a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b = vector_b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_of(entries: &[(&str, Vec<f32>)]) -> VectorStore {
        let artifacts = CorpusArtifacts {
            chunks: entries
                .iter()
                .map(|(content, _)| DocumentChunk::new(*content))
                .collect(),
            embeddings: entries.iter().map(|(_, embedding)| embedding.clone()).collect(),
        };
        VectorStore::from_artifacts(artifacts).expect("consistent artifacts")
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &c).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_mismatched_lengths() {
        assert!(cosine_similarity(&[1.0, 0.0], &[1.0]).abs() < f32::EPSILON);
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let store = store_of(&[
            ("far", vec![0.0, 1.0]),
            ("near", vec![1.0, 0.0]),
            ("middle", vec![0.7, 0.7]),
        ]);

        let results = store.search(&[1.0, 0.0], 3);
        let contents: Vec<&str> = results
            .iter()
            .map(|scored| scored.chunk.content.as_str())
            .collect();
        assert_eq!(contents, vec!["near", "middle", "far"]);
    }

    #[test]
    fn test_search_truncates_to_top_k() {
        let store = store_of(&[
            ("a", vec![1.0, 0.0]),
            ("b", vec![0.9, 0.1]),
            ("c", vec![0.0, 1.0]),
        ]);

        let results = store.search(&[1.0, 0.0], 2);
        assert_eq!(results.len(), 2);
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn test_search_empty_store() {
        let store = VectorStore::default();
        assert!(store.search(&[1.0, 0.0], 4).is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let artifacts = CorpusArtifacts {
            chunks: vec![DocumentChunk::new("alpha")],
            embeddings: Vec::new(),
        };
        assert!(VectorStore::from_artifacts(artifacts).is_err());
    }
}
