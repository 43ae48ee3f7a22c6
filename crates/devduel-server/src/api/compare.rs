use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use devduel_compare::{CompareError, CompareRequest, ComparisonReport, ReportFormat};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CompareBody {
    #[serde(rename = "userA")]
    pub user_a: String,
    #[serde(rename = "userB")]
    pub user_b: String,
    #[serde(default)]
    pub format: ReportFormat,
}

pub(super) async fn run_compare(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CompareBody>,
) -> Result<Json<ApiResponse<ComparisonReport>>, ApiError> {
    let request = CompareRequest::new(body.user_a, body.user_b).with_format(body.format);

    let report = state
        .pipeline
        .compare(&state.quota, &request)
        .await
        .map_err(|e| map_compare_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Converts the pipeline's failure taxonomy into the wire rejection shape.
///
/// Validation detail (including the raw model reply) stays in the logs; the
/// caller only ever sees the machine-readable code and a short message.
fn map_compare_error(request_id: String, error: &CompareError) -> ApiError {
    match error {
        CompareError::BadRequest(msg) => ApiError::new(request_id, "bad_request", msg.clone()),
        CompareError::QuotaExceeded => ApiError::new(
            request_id,
            "quota_exceeded",
            "API call limit reached for today. Try again tomorrow.",
        ),
        CompareError::SubjectNotFound { handles } => ApiError::new(
            request_id,
            "subject_not_found",
            format!("no GitHub profile found for: {}", handles.join(", ")),
        ),
        CompareError::ModelUnavailable(e) => {
            tracing::warn!(error = %e, "model provider unavailable");
            ApiError::new(
                request_id,
                "model_unavailable",
                "The analysis provider is unavailable. Try again later.",
            )
        }
        CompareError::InvalidModelOutput(e) => {
            tracing::error!(error = %e, "model reply failed validation");
            ApiError::new(
                request_id,
                "invalid_model_output",
                "The analysis provider returned an unusable reply.",
            )
        }
        CompareError::Store(e) => {
            tracing::error!(error = %e, "quota store failure");
            ApiError::new(request_id, "internal_error", "Internal server error.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_body_defaults_to_analytics_format() {
        let body: CompareBody =
            serde_json::from_str(r#"{"userA": "alice", "userB": "bob"}"#).expect("should parse");
        assert_eq!(body.user_a, "alice");
        assert_eq!(body.user_b, "bob");
        assert_eq!(body.format, ReportFormat::Analytics);
    }

    #[test]
    fn compare_body_accepts_narrative_format() {
        let body: CompareBody =
            serde_json::from_str(r#"{"userA": "a", "userB": "b", "format": "narrative"}"#)
                .expect("should parse");
        assert_eq!(body.format, ReportFormat::Narrative);
    }

    #[test]
    fn subject_not_found_names_every_missing_handle() {
        let err = map_compare_error(
            "req-1".to_owned(),
            &CompareError::SubjectNotFound {
                handles: vec!["ghost1".to_owned(), "ghost2".to_owned()],
            },
        );
        assert_eq!(err.error.code, "subject_not_found");
        assert!(err.error.message.contains("ghost1"));
        assert!(err.error.message.contains("ghost2"));
    }

    #[test]
    fn quota_denial_is_a_try_again_tomorrow() {
        let err = map_compare_error("req-2".to_owned(), &CompareError::QuotaExceeded);
        assert_eq!(err.error.code, "quota_exceeded");
        assert!(err.error.message.contains("tomorrow"));
    }
}
