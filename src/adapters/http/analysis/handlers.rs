//! HTTP handlers for the analysis endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::{GenerateAnalysisError, GenerateAnalysisHandler};

use super::dto::{AnalyzeRequest, ErrorResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AnalysisAppState {
    generate_handler: Arc<GenerateAnalysisHandler>,
}

impl AnalysisAppState {
    pub fn new(generate_handler: Arc<GenerateAnalysisHandler>) -> Self {
        Self { generate_handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/analyze - Analyze a business idea
pub async fn analyze(
    State(state): State<AnalysisAppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected analyze request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(rejection.body_text())),
            )
                .into_response();
        }
    };

    match state.generate_handler.handle(req.into()).await {
        Ok(result) => {
            tracing::info!(
                session_id = %result.session_id,
                attempts = result.attempts,
                corrected = result.corrected,
                "Analysis served"
            );
            (StatusCode::OK, Json(result.analysis)).into_response()
        }
        Err(e) => handle_analysis_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_analysis_error(error: GenerateAnalysisError) -> Response {
    if error.is_client_error() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(error.to_string())),
        )
            .into_response();
    }

    tracing::error!(error = %error, "Analysis request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::analysis_failed()),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::orchestration::OrchestrationError;

    #[test]
    fn client_errors_map_to_bad_request() {
        let response = handle_analysis_error(GenerateAnalysisError::EmptyPrompt);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn orchestration_failure_maps_to_internal_error() {
        let error = GenerateAnalysisError::Failed(OrchestrationError::RetriesExhausted {
            attempts: 3,
            issues: vec!["attempt 1: Missing required field: summary".into()],
        });
        let response = handle_analysis_error(error);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
