//! Retrieval-and-generation pipeline and session state machine for the sage
//! study assistant.
//!
//! The engine answers corpus questions by similarity search plus grounded
//! generation, produces quiz flashcards from whole-corpus samples, and owns
//! the per-session interaction state both modes run on. Everything here is
//! driven by an external presentation layer; rendering never happens in this
//! crate.

/// Flashcard generation from corpus samples.
pub mod flashcards;
/// Prompt construction.
pub mod prompt;
/// The RAG answer flow.
pub mod retrieval;
/// Per-session interaction state and transitions.
pub mod session;

pub use flashcards::DeckResult;
pub use retrieval::NO_RELEVANT_INFORMATION;
pub use session::{GradeOutcome, Mode, Session};
