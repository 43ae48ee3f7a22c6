use thiserror::Error;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by GitHub (status {status})")]
    RateLimited { status: u16 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid handle \"{handle}\": {reason}")]
    InvalidHandle { handle: String, reason: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
