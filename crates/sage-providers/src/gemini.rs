use async_trait::async_trait;
use reqwest::Client;
use sage_core::{Error, GenerationRequest, Result, TextGenerator};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;

/// Gemini API endpoint base URL.
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Default model for Gemini.
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// Env var key for the Gemini API key.
const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Gemini API generation provider.
pub struct GeminiProvider {
    /// HTTP client for API requests.
    client: Client,
    /// Gemini API key.
    api_key: String,
    /// Model name to use.
    model: String,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider` with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the provided API key is empty.
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::MissingApiKey(ENV_GEMINI_API_KEY.to_owned()));
        }

        Ok(Self {
            client: Client::default(),
            api_key,
            model: DEFAULT_MODEL.to_owned(),
        })
    }

    /// Creates a new `GeminiProvider` from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the `GEMINI_API_KEY` environment variable is not set.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(ENV_GEMINI_API_KEY)
            .map_err(|_| Error::MissingApiKey(ENV_GEMINI_API_KEY.to_owned()))?;
        Self::new(api_key)
    }

    /// Creates a new `GeminiProvider` from config or environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not provided by either source.
    pub fn from_config_or_env(config_key: Option<String>) -> Result<Self> {
        let api_key = config_key
            .or_else(|| env::var(ENV_GEMINI_API_KEY).ok())
            .ok_or_else(|| {
                Error::MissingApiKey(format!("{ENV_GEMINI_API_KEY} or config.toml api_key"))
            })?;
        Self::new(api_key)
    }

    /// Sets the model to use for generation.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Builds the wire request for a generation request.
    fn build_request(request: &GenerationRequest) -> GeminiRequest {
        let generation_config = request.schema.as_ref().map(|schema| GenerationConfig {
            response_mime_type: "application/json".to_owned(),
            response_schema: schema.to_value(),
        });

        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config,
        }
    }
}

/// Request payload sent to the Gemini `generateContent` API.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    /// Conversation turns; a single user turn for this assistant.
    contents: Vec<GeminiContent>,
    /// Structured-output settings, present only for schema requests.
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// One conversation turn.
#[derive(Debug, Serialize)]
struct GeminiContent {
    /// Parts composing the turn.
    parts: Vec<GeminiPart>,
}

/// A single text part.
#[derive(Debug, Serialize)]
struct GeminiPart {
    /// Text content of the part.
    text: String,
}

/// Structured-output settings for schema-constrained requests.
#[derive(Debug, Serialize)]
struct GenerationConfig {
    /// MIME type the response must use.
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    /// JSON schema the response must conform to.
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

/// Response payload returned by Gemini.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    /// List of candidate completions.
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

/// A single completion candidate.
#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    /// Content generated for the candidate.
    content: GeminiCandidateContent,
}

/// Generated content of a candidate.
#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    /// Generated parts.
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

/// A generated text part.
#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    /// Generated text content.
    text: String,
}

#[async_trait]
impl TextGenerator for GeminiProvider {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let payload = Self::build_request(request);
        let url = format!("{GEMINI_API_URL}/{}:generateContent", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|err| Error::Provider(format!("Gemini API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_owned());
            return Err(Error::Provider(format!(
                "Gemini API error {status}: {error_text}"
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|err| Error::Provider(format!("Failed to parse Gemini response: {err}")))?;

        let candidate = gemini_response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidResponse("No candidates from Gemini".to_owned()))?;

        let text: String = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect();

        if text.is_empty() {
            return Err(Error::InvalidResponse("Empty candidate from Gemini".to_owned()));
        }

        Ok(text)
    }
}
