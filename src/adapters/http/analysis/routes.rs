//! Axum router configuration for the analysis endpoint.

use axum::{routing::post, Router};

use super::handlers::{analyze, AnalysisAppState};

/// Create the analysis API router.
///
/// # Routes
/// - `POST /analyze` - Turn a business idea into a validated analysis
pub fn analysis_routes() -> Router<AnalysisAppState> {
    Router::new().route("/analyze", post(analyze))
}

/// Create the complete analysis router, mounted under `/api`.
pub fn analysis_router(state: AnalysisAppState) -> Router {
    Router::new()
        .nest("/api", analysis_routes())
        .with_state(state)
}
