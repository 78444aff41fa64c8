//! HTTP adapter for the analysis endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::{AnalyzeRequest, AnalyzeSettings, ErrorResponse};
pub use handlers::{analyze, AnalysisAppState};
pub use routes::{analysis_router, analysis_routes};
