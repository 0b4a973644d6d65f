//! Gemini cloud provider
//!
//! Single-shot `generateContent` calls against the Google Generative
//! Language API. The prompt travels as the sole content part; the API
//! key is attached as the `x-goog-api-key` request header. Any
//! deviation from the expected response shape is a hard failure for
//! that call (the gateway decides whether anything else can answer).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sitewarden_core::{Error, ModelSource, Result};
use std::time::Duration;
use tracing::debug;

use crate::provider::ModelProvider;

/// Default generation endpoint
pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the Gemini provider.
///
/// The API key is deliberately configuration, never a source literal.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Full generateContent endpoint URL
    pub endpoint: String,

    /// API key sent in the `x-goog-api-key` header
    pub api_key: String,

    /// Hard timeout for the HTTP round trip
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Configuration for the default endpoint with the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Cloud provider speaking the generateContent wire contract
pub struct GeminiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiProvider {
    /// Create a provider with its own HTTP client
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::provider(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn source(&self) -> ModelSource {
        ModelSource::Cloud
    }

    async fn available(&self) -> bool {
        // No remote probe: an empty key is the only local reason the
        // call cannot possibly succeed.
        !self.api_key.is_empty()
    }

    async fn ask(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest::single_part(prompt);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout
                } else {
                    Error::provider(format!("cloud request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let detail = detail.chars().take(200).collect::<String>();
            return Err(Error::provider(format!(
                "cloud request failed: {} {}",
                status, detail
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::provider(format!("malformed cloud response: {}", e)))?;

        let text = parsed
            .into_text()
            .ok_or_else(|| Error::provider("no response text from cloud API"))?;

        debug!(chars = text.len(), "cloud response received");
        Ok(text)
    }
}

// =============================================================================
// Wire structures
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

impl<'a> GenerateRequest<'a> {
    /// Prompt as the sole content part
    fn single_part(text: &'a str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Extract the first candidate's first part, trimmed.
    ///
    /// Empty text counts as absent.
    fn into_text(self) -> Option<String> {
        let text = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
