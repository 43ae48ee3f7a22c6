//! Retry with exponential back-off and jitter for the GitHub client.
//!
//! Only profile retrieval is retried; the comparison core never retries the
//! model call. Non-transient errors (4xx other than 429, deserialization
//! failures, invalid handles) are returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::GithubError;

/// Returns `true` for errors worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset.
/// - HTTP 5xx responses: transient server errors.
/// - [`GithubError::RateLimited`] — GitHub asked us to back off.
///
/// **Not retriable (hard stop):**
/// - [`GithubError::UnexpectedStatus`] below 500 — retrying won't change a 403.
/// - [`GithubError::Deserialize`] — malformed response; retrying won't fix it.
/// - [`GithubError::InvalidHandle`] — caller error.
pub(crate) fn is_retriable(err: &GithubError) -> bool {
    match err {
        GithubError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        GithubError::RateLimited { .. } => true,
        GithubError::UnexpectedStatus { status, .. } => *status >= 500,
        GithubError::Deserialize { .. }
        | GithubError::InvalidHandle { .. }
        | GithubError::InvalidUrl(_) => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The wait before the n-th retry is `backoff_base_ms * 2^(n-1)` milliseconds
/// with ±25% jitter, capped at 60 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, GithubError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GithubError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "GitHub transient error — retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
