//! Mock generator for testing pipeline behavior.
//!
//! Allows defining canned responses for specific prompts and injecting
//! failures, enabling end-to-end testing of the answer and flashcard flows
//! without real API calls.

use async_trait::async_trait;
use sage_core::{Error, GenerationRequest, Result, TextGenerator};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Locks a mutex, recovering the guard if a test thread panicked while holding it.
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Mock generator that returns pre-defined responses based on prompt patterns.
#[derive(Clone, Default)]
pub struct MockGenerator {
    /// Predefined responses keyed by prompt substring.
    responses: Arc<Mutex<HashMap<String, String>>>,
    /// Default response if no pattern matches.
    default_response: Arc<Mutex<Option<String>>>,
    /// Error message to fail every call with, when set.
    failure: Arc<Mutex<Option<String>>>,
    /// Prompt history for verification.
    call_history: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockGenerator {
    /// Create a new mock generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pattern-based response.
    #[must_use]
    pub fn with_response(self, pattern: impl Into<String>, response: impl Into<String>) -> Self {
        {
            let mut responses = lock_unpoisoned(&self.responses);
            responses.insert(pattern.into(), response.into());
        }
        self
    }

    /// Set a default response for prompts that don't match any pattern.
    #[must_use]
    pub fn with_default_response(self, response: impl Into<String>) -> Self {
        {
            let mut default = lock_unpoisoned(&self.default_response);
            *default = Some(response.into());
        }
        self
    }

    /// Make every subsequent call fail with the given message.
    #[must_use]
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        {
            let mut failure = lock_unpoisoned(&self.failure);
            *failure = Some(message.into());
        }
        self
    }

    /// Get the recorded requests, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<GenerationRequest> {
        let history = lock_unpoisoned(&self.call_history);
        history.clone()
    }

    /// Get the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        let history = lock_unpoisoned(&self.call_history);
        history.len()
    }

    /// Find a matching response for the given prompt.
    fn find_response(&self, prompt: &str) -> Option<String> {
        let responses = lock_unpoisoned(&self.responses);

        if let Some(response) = responses.get(prompt) {
            return Some(response.clone());
        }

        responses
            .iter()
            .find(|(pattern, _)| prompt.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        {
            let mut history = lock_unpoisoned(&self.call_history);
            history.push(request.clone());
        }

        {
            let failure = lock_unpoisoned(&self.failure);
            if let Some(message) = failure.as_ref() {
                return Err(Error::Provider(message.clone()));
            }
        }

        let text = self.find_response(&request.prompt).unwrap_or_else(|| {
            let default = lock_unpoisoned(&self.default_response);
            default
                .clone()
                .unwrap_or_else(|| format!("Mock response for prompt: {}", request.prompt))
        });

        Ok(text)
    }
}
