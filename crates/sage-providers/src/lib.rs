//! Generation clients for external LLM services.

/// Gemini provider implementation.
pub mod gemini;
/// Mock generator for testing.
pub mod mock;

pub use gemini::GeminiProvider;
pub use mock::MockGenerator;
