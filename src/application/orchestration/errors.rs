//! Orchestration error taxonomy.
//!
//! `AttemptFailure` is internal: every variant is retryable and never leaves
//! the orchestrator. `OrchestrationError` is what callers see.

use thiserror::Error;

use crate::domain::analysis::SanitizeError;
use crate::domain::foundation::TransitionError;
use crate::ports::{AIError, SessionStoreError};

/// Why a single attempt did not produce a usable analysis.
#[derive(Debug, Error)]
pub enum AttemptFailure {
    #[error("no JSON object in model output: {0}")]
    NoJsonFound(#[from] SanitizeError),

    #[error("candidate is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("structural validation failed with {} issue(s)", .0.len())]
    StructuralValidationFailed(Vec<String>),

    #[error("uncorrectable consistency issues: {}", .0.join("; "))]
    ConsistencyUncorrectable(Vec<String>),

    #[error("model provider failed: {0}")]
    Provider(#[from] AIError),
}

impl AttemptFailure {
    /// Issue lines describing this failure, for feedback and diagnostics.
    pub fn issues(&self) -> Vec<String> {
        match self {
            Self::StructuralValidationFailed(issues) | Self::ConsistencyUncorrectable(issues) => {
                issues.clone()
            }
            other => vec![other.to_string()],
        }
    }

    /// True when the model itself produced the bad output.
    ///
    /// Only these failures are fed back to the model on the next attempt.
    pub fn is_model_output_problem(&self) -> bool {
        !matches!(self, Self::Provider(_))
    }

    /// Short label for logs and history.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoJsonFound(_) => "no_json_found",
            Self::InvalidJson(_) => "invalid_json",
            Self::StructuralValidationFailed(_) => "structural_validation_failed",
            Self::ConsistencyUncorrectable(_) => "consistency_uncorrectable",
            Self::Provider(_) => "provider_error",
        }
    }
}

/// Failures that escape the orchestrator.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// Every allowed attempt failed; `issues` holds each attempt's issues in order.
    #[error("analysis failed after {attempts} attempt(s)")]
    RetriesExhausted { attempts: u32, issues: Vec<String> },

    /// Session bookkeeping broke; not related to the model's output.
    #[error("session error: {0}")]
    Session(#[from] SessionStoreError),

    #[error("illegal attempt state change: {0}")]
    State(#[from] TransitionError),
}
