use core::result::Result as CoreResult;
use std::io::Error as IoError;
use std::path::PathBuf;

use reqwest::Error as ReqwestError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for core operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// An HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] SerdeJsonError),

    /// TOML deserialization failed.
    #[error("TOML deserialization error: {0}")]
    Toml(#[from] TomlError),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A generation provider encountered an error.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Required API key was not found.
    #[error("API key not found: {0}")]
    MissingApiKey(String),

    /// Generation provider returned an invalid response.
    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),

    /// A structured-output schema descriptor is malformed.
    #[error("Invalid response schema: {0}")]
    InvalidSchema(String),

    /// Required index artifact files are absent from the index directory.
    #[error("Missing index artifacts in {}: {}", .dir.display(), .files.join(", "))]
    IndexArtifactsMissing {
        /// Directory that was searched.
        dir: PathBuf,
        /// Names of the absent artifact files.
        files: Vec<String>,
    },

    /// Index artifacts are present but internally inconsistent.
    #[error("Corrupt index: {0}")]
    IndexCorrupt(String),

    /// Embedding generation failed.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// A general error not covered by other variants.
    #[error("{0}")]
    Other(String),
}
