use async_trait::async_trait;

use crate::{ResponseSchema, Result};

/// A single generation request: a prompt, optionally constrained to a
/// structured-output shape.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Full prompt text sent to the generator.
    pub prompt: String,
    /// Expected output shape, when the caller wants JSON instead of free text.
    pub schema: Option<ResponseSchema>,
}

impl GenerationRequest {
    /// Creates a free-text request.
    pub fn new<T: Into<String>>(prompt: T) -> Self {
        Self {
            prompt: prompt.into(),
            schema: None,
        }
    }

    /// Attaches a structured-output schema, validating it at this boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema descriptor is malformed.
    pub fn with_schema(mut self, schema: ResponseSchema) -> Result<Self> {
        schema.validate()?;
        self.schema = Some(schema);
        Ok(self)
    }
}

/// Trait for text generators that can answer prompts.
///
/// A generator performs exactly one attempt per call: it either returns the
/// generated text, or fails. Retry and recovery policy belongs to callers.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the unique identifier for this generator.
    fn name(&self) -> &'static str;

    /// Checks whether this generator is currently able to process requests.
    async fn is_available(&self) -> bool;

    /// Generates output for the given request.
    ///
    /// With a schema attached the returned string is the raw JSON text
    /// conforming to the schema; the caller parses it. Without a schema the
    /// returned string is free text.
    ///
    /// # Errors
    ///
    /// Returns an error if the generator is unavailable, the request fails,
    /// or the response cannot be read.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
