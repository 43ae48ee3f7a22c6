use thiserror::Error;

use crate::quota::QuotaStoreError;

/// Failure taxonomy for one comparison run.
///
/// Every variant is user-visible through the service boundary except the
/// detail carried by `InvalidModelOutput`, which is retained for diagnostics
/// only and never shown to the caller.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("daily comparison limit reached — try again tomorrow")]
    QuotaExceeded,

    #[error("subject not found: {}", handles.join(", "))]
    SubjectNotFound { handles: Vec<String> },

    #[error("model provider unavailable")]
    ModelUnavailable(#[source] GeminiError),

    #[error("model reply violated the comparison contract")]
    InvalidModelOutput(#[source] ValidationError),

    #[error(transparent)]
    Store(#[from] QuotaStoreError),
}

/// Faults from the Gemini `generateContent` call. All of them collapse to
/// [`CompareError::ModelUnavailable`] at the pipeline boundary.
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from model provider")]
    UnexpectedStatus { status: u16 },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("model returned no candidates")]
    EmptyReply,

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

/// Why a model reply failed validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The reply is not parseable as structured data at all. The raw text is
    /// kept for diagnostics — it is never coerced to an empty object.
    #[error("model reply is not valid JSON: {source}")]
    Malformed {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// The reply parsed but misses a required section or carries an
    /// out-of-contract value at `path`.
    #[error("schema violation at {path}: {reason}")]
    SchemaViolation { path: String, reason: String },
}

impl ValidationError {
    pub(crate) fn violation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::SchemaViolation {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
