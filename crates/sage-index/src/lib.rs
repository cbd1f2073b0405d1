//! Corpus index for the sage study assistant.
//!
//! This crate consumes a pre-built vector index over document chunks: it
//! loads the persisted artifacts, holds them in an immutable in-memory
//! store, and answers similarity searches using query-time embeddings.
//! Building the artifacts is the concern of an external indexing tool.

/// Persisted index artifact loading.
pub mod artifact;
/// Embedding providers for query-time embeddings.
pub mod embedding;
/// In-memory vector store and similarity search.
pub mod store;

pub use artifact::{CHUNKS_FILE, CorpusArtifacts, DocumentChunk, EMBEDDINGS_FILE};
pub use embedding::{EmbeddingProvider, OllamaEmbeddingClient};
pub use store::{ScoredChunk, VectorStore};

use std::path::Path;
use std::sync::{Arc, OnceLock};

use sage_core::Result;

/// A loaded corpus index paired with the embedder used for queries.
pub struct SemanticIndex<E: EmbeddingProvider> {
    store: VectorStore,
    embedder: E,
}

impl<E: EmbeddingProvider> SemanticIndex<E> {
    /// Creates an index over an already-loaded store.
    pub fn new(store: VectorStore, embedder: E) -> Self {
        Self { store, embedder }
    }

    /// Returns the `k` chunks most similar to `query`, most relevant first.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding the query fails.
    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk<'_>>> {
        let query_embedding = self.embedder.embed(query).await?;
        Ok(self.store.search(&query_embedding, k))
    }

    /// All chunks in the backing store, in store order.
    pub fn chunks(&self) -> &[DocumentChunk] {
        self.store.chunks()
    }

    /// Number of chunks in the index.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl SemanticIndex<OllamaEmbeddingClient> {
    /// Loads the persisted artifacts from `dir` with the default embedder.
    ///
    /// # Errors
    ///
    /// Returns an error if artifact files are missing or corrupt.
    pub fn load(dir: &Path, embedding_model: &str) -> Result<Self> {
        let artifacts = CorpusArtifacts::load(dir)?;
        let store = VectorStore::from_artifacts(artifacts)?;
        Ok(Self::new(store, OllamaEmbeddingClient::new(embedding_model)))
    }
}

/// Process-wide index handle, loaded at most once.
static SHARED_INDEX: OnceLock<Arc<SemanticIndex<OllamaEmbeddingClient>>> = OnceLock::new();

/// Returns the process-wide index, loading it on first call.
///
/// Later calls ignore the arguments and return the already-loaded handle;
/// every session shares the same read-only index.
///
/// # Errors
///
/// Returns an error if the first load fails. A failed load is not cached,
/// so the caller may retry after fixing the artifacts.
pub fn shared_index(
    dir: &Path,
    embedding_model: &str,
) -> Result<Arc<SemanticIndex<OllamaEmbeddingClient>>> {
    if let Some(index) = SHARED_INDEX.get() {
        return Ok(Arc::clone(index));
    }

    let loaded = Arc::new(SemanticIndex::load(dir, embedding_model)?);
    Ok(Arc::clone(SHARED_INDEX.get_or_init(|| loaded)))
}
