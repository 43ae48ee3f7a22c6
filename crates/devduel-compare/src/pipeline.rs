//! Comparison pipeline orchestration.
//!
//! One run walks five states in order — gate, fetch, prompt, model call,
//! validate — and only a fully successful run commits the quota increment.
//! Any failure short-circuits to a [`CompareError`] without attempting the
//! later states, so failed runs never consume quota and never invoke the
//! model more than once.

use chrono::Local;

use devduel_github::{fetch_pair, GithubClient};

use crate::error::CompareError;
use crate::gemini::GeminiClient;
use crate::prompt::build_prompt;
use crate::quota::{QuotaCommit, QuotaDecision, QuotaStore};
use crate::report::{ComparisonReport, ReportFormat};
use crate::validate::validate_reply;

/// The two subject handles plus the output contract to hold the model to.
///
/// Handles are opaque: the core checks non-emptiness only, stricter syntax
/// is the retrieval boundary's concern.
#[derive(Debug, Clone)]
pub struct CompareRequest {
    pub handle_a: String,
    pub handle_b: String,
    pub format: ReportFormat,
}

impl CompareRequest {
    #[must_use]
    pub fn new(handle_a: impl Into<String>, handle_b: impl Into<String>) -> Self {
        Self {
            handle_a: handle_a.into(),
            handle_b: handle_b.into(),
            format: ReportFormat::default(),
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }
}

/// Composes profile retrieval, prompt construction, the model call, and
/// reply validation into one operation behind a quota gate.
pub struct ComparePipeline {
    github: GithubClient,
    model: GeminiClient,
}

impl ComparePipeline {
    #[must_use]
    pub fn new(github: GithubClient, model: GeminiClient) -> Self {
        Self { github, model }
    }

    /// Runs one comparison end to end.
    ///
    /// State transitions are strictly sequential; between two concurrent
    /// runs there is no ordering guarantee — the race on the shared daily
    /// counter is closed by the store's atomic commit, which is re-validated
    /// here after the model call.
    ///
    /// # Errors
    ///
    /// Every failure kind is a [`CompareError`] variant; nothing propagates
    /// unstructured. Nothing is retried: retrying means re-spending quota
    /// and model budget, which is the caller's call.
    pub async fn compare<Q: QuotaStore>(
        &self,
        quota: &Q,
        request: &CompareRequest,
    ) -> Result<ComparisonReport, CompareError> {
        let handle_a = request.handle_a.trim();
        let handle_b = request.handle_b.trim();
        if handle_a.is_empty() || handle_b.is_empty() {
            return Err(CompareError::BadRequest(
                "both subject handles are required".to_owned(),
            ));
        }

        // Day boundary is local midnight; computed once so a run that
        // crosses midnight commits against the day it was admitted for.
        let day = Local::now().date_naive();

        if quota.admit(day).await? == QuotaDecision::Denied {
            tracing::info!(%day, "comparison denied: daily limit reached");
            return Err(CompareError::QuotaExceeded);
        }

        let (profile_a, profile_b) = fetch_pair(&self.github, handle_a, handle_b).await;
        let (profile_a, profile_b) = match (profile_a, profile_b) {
            (Some(a), Some(b)) => (a, b),
            (a, b) => {
                let mut handles = Vec::new();
                if a.is_none() {
                    handles.push(handle_a.to_owned());
                }
                if b.is_none() {
                    handles.push(handle_b.to_owned());
                }
                tracing::info!(missing = ?handles, "comparison aborted: subject(s) absent");
                return Err(CompareError::SubjectNotFound { handles });
            }
        };

        let prompt = build_prompt(&profile_a, &profile_b, request.format);

        let reply = self
            .model
            .generate(&prompt)
            .await
            .map_err(CompareError::ModelUnavailable)?;

        let report = validate_reply(&reply, request.format).map_err(|e| {
            tracing::warn!(error = %e, "model reply failed validation");
            CompareError::InvalidModelOutput(e)
        })?;

        match quota.commit(day).await? {
            QuotaCommit::Committed { count } => {
                tracing::info!(
                    %day,
                    count,
                    handle_a,
                    handle_b,
                    format = %request.format,
                    "comparison completed"
                );
                Ok(report)
            }
            QuotaCommit::Denied => {
                // A concurrent run took the last slot between our admission
                // and commit. The model call is already spent; report the
                // denial rather than silently exceeding the budget.
                tracing::warn!(%day, "quota commit denied post-hoc");
                Err(CompareError::QuotaExceeded)
            }
        }
    }
}
