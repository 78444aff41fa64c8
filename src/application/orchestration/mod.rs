//! Analysis orchestration.
//!
//! Drives one business idea through generate, sanitize, validate and
//! check-consistency, retrying with feedback until an analysis is accepted
//! or the retry budget runs out.

mod errors;
mod lease;
mod orchestrator;
mod prompts;

pub use errors::{AttemptFailure, OrchestrationError};
pub use lease::SessionLease;
pub use orchestrator::{AnalysisOrchestrator, AnalysisOutcome, ModelSelection, OrchestratorSettings};
pub use prompts::{echoed_output, idea_prompt, retry_feedback, system_prompt};
