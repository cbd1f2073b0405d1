//! Loading of persisted corpus index artifacts.
//!
//! A corpus index directory holds exactly two files: [`CHUNKS_FILE`] with the
//! document chunks and [`EMBEDDINGS_FILE`] with their embedding vectors, both
//! bincode-encoded with a format version for invalidation. The two files are
//! written together by the external indexing tool; this module only reads
//! them and checks that they agree with each other.

use bincode::config::standard as bincode_config;
use bincode::{Decode, Encode, decode_from_slice};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use sage_core::{Error, Result};

/// Artifact file holding the document chunks.
pub const CHUNKS_FILE: &str = "chunks.bin";
/// Artifact file holding the embedding vectors.
pub const EMBEDDINGS_FILE: &str = "embeddings.bin";

/// An immutable unit of corpus text with opaque metadata.
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct DocumentChunk {
    /// The chunk's text content.
    pub content: String,
    /// Source metadata, passed through untouched.
    pub metadata: HashMap<String, String>,
}

impl DocumentChunk {
    /// Creates a chunk without metadata.
    pub fn new<T: Into<String>>(content: T) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
        }
    }
}

/// On-disk payload of [`CHUNKS_FILE`].
#[derive(Debug, Encode, Decode)]
struct ChunkArtifact {
    /// Format version for invalidation.
    version: u32,
    /// The corpus chunks, in index order.
    chunks: Vec<DocumentChunk>,
}

/// On-disk payload of [`EMBEDDINGS_FILE`].
#[derive(Debug, Encode, Decode)]
struct EmbeddingArtifact {
    /// Format version for invalidation.
    version: u32,
    /// Dimension every embedding vector must have.
    dimension: u32,
    /// One embedding per chunk, in the same order as the chunk artifact.
    embeddings: Vec<Vec<f32>>,
}

/// The decoded pair of index artifacts, checked for mutual consistency.
#[derive(Debug)]
pub struct CorpusArtifacts {
    /// The corpus chunks, in index order.
    pub chunks: Vec<DocumentChunk>,
    /// One embedding per chunk, same order.
    pub embeddings: Vec<Vec<f32>>,
}

impl CorpusArtifacts {
    /// Artifact format version this reader understands.
    pub const VERSION: u32 = 1;

    /// Loads and validates the artifact pair from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexArtifactsMissing`] naming every absent file, or
    /// [`Error::IndexCorrupt`] when the files disagree with each other or
    /// carry an unknown format version.
    pub fn load(dir: &Path) -> Result<Self> {
        let missing: Vec<String> = [CHUNKS_FILE, EMBEDDINGS_FILE]
            .iter()
            .filter(|name| !dir.join(name).exists())
            .map(|name| (*name).to_owned())
            .collect();

        if !missing.is_empty() {
            return Err(Error::IndexArtifactsMissing {
                dir: dir.to_path_buf(),
                files: missing,
            });
        }

        let chunk_artifact: ChunkArtifact = decode_file(&dir.join(CHUNKS_FILE))?;
        let embedding_artifact: EmbeddingArtifact = decode_file(&dir.join(EMBEDDINGS_FILE))?;

        if chunk_artifact.version != Self::VERSION {
            return Err(Error::IndexCorrupt(format!(
                "unsupported chunk artifact version {} (expected {})",
                chunk_artifact.version,
                Self::VERSION
            )));
        }
        if embedding_artifact.version != Self::VERSION {
            return Err(Error::IndexCorrupt(format!(
                "unsupported embedding artifact version {} (expected {})",
                embedding_artifact.version,
                Self::VERSION
            )));
        }

        if chunk_artifact.chunks.len() != embedding_artifact.embeddings.len() {
            return Err(Error::IndexCorrupt(format!(
                "chunk count ({}) does not match embedding count ({})",
                chunk_artifact.chunks.len(),
                embedding_artifact.embeddings.len()
            )));
        }

        let dimension = embedding_artifact.dimension as usize;
        if let Some(bad) = embedding_artifact
            .embeddings
            .iter()
            .position(|embedding| embedding.len() != dimension)
        {
            return Err(Error::IndexCorrupt(format!(
                "embedding {bad} has dimension {} (expected {dimension})",
                embedding_artifact.embeddings[bad].len()
            )));
        }

        tracing::info!(
            "Loaded corpus index from {}: {} chunks, dimension {}",
            dir.display(),
            chunk_artifact.chunks.len(),
            dimension
        );

        Ok(Self {
            chunks: chunk_artifact.chunks,
            embeddings: embedding_artifact.embeddings,
        })
    }
}

/// Reads and bincode-decodes one artifact file.
fn decode_file<T: Decode<()>>(path: &Path) -> Result<T> {
    let data = fs::read(path)
        .map_err(|error| Error::Other(format!("Failed to read {}: {error}", path.display())))?;

    decode_from_slice(&data, bincode_config())
        .map(|(decoded, _)| decoded)
        .map_err(|error| {
            Error::IndexCorrupt(format!("failed to decode {}: {error}", path.display()))
        })
}
