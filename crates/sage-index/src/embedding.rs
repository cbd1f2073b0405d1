//! Query-time embedding generation via Ollama.

use ollama_rs::Ollama;
use ollama_rs::generation::embeddings::request::GenerateEmbeddingsRequest;
use std::env;
use std::future::Future;

use sage_core::{Error, Result};

/// A single embedding vector
type Embedding = Vec<f32>;

/// Trait for generating embeddings from text
pub trait EmbeddingProvider: Send + Sync {
    /// Ensure the embedding model is available
    ///
    /// # Errors
    /// Returns an error if the model is not available or cannot be reached
    fn ensure_model_available(&self) -> impl Future<Output = Result<()>> + Send;

    /// Generate embedding for text
    ///
    /// # Errors
    /// Returns an error if embedding generation fails
    fn embed(&self, text: &str) -> impl Future<Output = Result<Embedding>> + Send;
}

/// Ollama embedding client
pub struct OllamaEmbeddingClient {
    ollama: Ollama,
    model: String,
}

impl OllamaEmbeddingClient {
    /// Creates a client for the given embedding model, honoring `OLLAMA_HOST`.
    pub fn new(model: &str) -> Self {
        let host = env::var("OLLAMA_HOST").unwrap_or_else(|_| "http://localhost:11434".to_owned());
        Self {
            ollama: Ollama::new(host, 11434),
            model: model.to_owned(),
        }
    }
}

impl EmbeddingProvider for OllamaEmbeddingClient {
    async fn ensure_model_available(&self) -> Result<()> {
        let models = self.ollama.list_local_models().await.map_err(|error| {
            Error::Embedding(format!(
                "Failed to connect to Ollama: {error}. Ensure Ollama is installed and running (ollama serve)."
            ))
        })?;

        let model_available = models.iter().any(|model| model.name.contains(&self.model));
        if !model_available {
            return Err(Error::Embedding(format!(
                "Embedding model '{}' not found. Run: ollama pull {}",
                self.model, self.model
            )));
        }

        Ok(())
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        let request = GenerateEmbeddingsRequest::new(self.model.clone(), text.to_owned().into());

        let response = self
            .ollama
            .generate_embeddings(request)
            .await
            .map_err(|error| Error::Embedding(format!("Embedding generation failed: {error}")))?;

        response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("No embeddings returned".to_owned()))
    }
}

/// Test-only fake embedding provider (deterministic, hash-based)
#[cfg(test)]
pub struct FakeEmbeddingClient;

#[cfg(test)]
impl EmbeddingProvider for FakeEmbeddingClient {
    async fn ensure_model_available(&self) -> Result<()> {
        Ok(())
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        Ok(fake_embedding(text))
    }
}

/// Generate fake deterministic embedding for testing
#[cfg(test)]
fn fake_embedding(text: &str) -> Embedding {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash as _, Hasher as _};

    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    let hash = hasher.finish();

    let mut vec = Vec::with_capacity(16);
    for idx in 0..16 {
        let value = ((hash.wrapping_add(idx as u64)) % 1000) as f32 / 1000.0;
        vec.push(value);
    }
    vec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{CorpusArtifacts, DocumentChunk};
    use crate::{SemanticIndex, VectorStore};

    #[test]
    fn test_fake_embedding_is_deterministic() {
        assert_eq!(fake_embedding("zk proofs"), fake_embedding("zk proofs"));
        assert_ne!(fake_embedding("zk proofs"), fake_embedding("consensus"));
    }

    #[tokio::test]
    async fn test_semantic_index_search_with_fake_embedder() {
        let query = "what is a receipt";
        let query_embedding = fake_embedding(query);

        // One chunk embedded exactly like the query, one pointing elsewhere.
        let mut other = query_embedding.clone();
        other.reverse();

        let artifacts = CorpusArtifacts {
            chunks: vec![DocumentChunk::new("receipts explained"), DocumentChunk::new("other")],
            embeddings: vec![query_embedding, other],
        };
        let store = VectorStore::from_artifacts(artifacts).expect("store");
        let index = SemanticIndex::new(store, FakeEmbeddingClient);

        let results = index.similarity_search(query, 1).await.expect("search");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.content, "receipts explained");
    }
}
