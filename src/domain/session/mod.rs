//! Session domain module.
//!
//! Ephemeral per-request state: attempt lifecycle, step history, retry
//! counter and the last decoded analysis. Nothing here outlives the request
//! that created it.

mod context;
mod state;

pub use context::{AnalysisSession, SessionMessage, SessionMetadata, SessionRole, ValidationStatus};
pub use state::{AttemptState, OrchestrationStep};
