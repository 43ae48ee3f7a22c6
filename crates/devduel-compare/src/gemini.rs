//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! One request per comparison run, no retries: re-invoking the provider is a
//! caller decision, never this crate's — a retry here would silently re-spend
//! model budget.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::GeminiError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Client for the Gemini generative-language REST API.
///
/// Use [`GeminiClient::new`] for production or [`GeminiClient::with_base_url`]
/// to point at a mock server in tests.
pub struct GeminiClient {
    client: Client,
    base_url: Url,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    /// Creates a new client pointed at the production Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, GeminiError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeminiError::InvalidUrl`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| GeminiError::InvalidUrl(format!("base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
        })
    }

    /// Sends the rendered prompt and returns the model's raw text reply.
    ///
    /// The reply is untrusted: callers must run it through
    /// [`crate::validate::validate_reply`] before treating it as structured
    /// data.
    ///
    /// # Errors
    ///
    /// - [`GeminiError::Http`] — network or TLS failure.
    /// - [`GeminiError::UnexpectedStatus`] — any non-2xx provider status.
    /// - [`GeminiError::Deserialize`] — response envelope is not the
    ///   expected shape.
    /// - [`GeminiError::EmptyReply`] — the provider returned no candidates.
    pub async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let url = self.generate_url()?;
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeminiError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let raw = response.text().await?;
        let envelope: GenerateResponse =
            serde_json::from_str(&raw).map_err(|e| GeminiError::Deserialize {
                context: "generateContent response".to_owned(),
                source: e,
            })?;

        let Some(candidate) = envelope.candidates.into_iter().next() else {
            return Err(GeminiError::EmptyReply);
        };

        let text: String = candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect();

        if text.trim().is_empty() {
            return Err(GeminiError::EmptyReply);
        }

        Ok(text)
    }

    fn generate_url(&self) -> Result<Url, GeminiError> {
        self.base_url
            .join(&format!("v1beta/models/{}:generateContent", self.model))
            .map_err(|e| GeminiError::InvalidUrl(format!("model '{}': {e}", self.model)))
    }
}
