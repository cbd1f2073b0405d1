//! Core types and traits for the sage study assistant.
//!
//! This crate provides the shared data model, error handling, configuration,
//! and the text-generation trait used across the sage workspace.

/// Configuration types and file handling.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Structured-output schema descriptors.
pub mod schema;
/// Trait definitions for text generators.
pub mod traits;
/// Core data types for chat transcripts and flashcards.
pub mod types;

pub use config::SageConfig;
pub use error::{Error, Result};
pub use schema::{FieldKind, ResponseSchema, SchemaField};
pub use traits::{GenerationRequest, TextGenerator};
pub use types::{ChatMessage, Flashcard, FlashcardScore, Role};
