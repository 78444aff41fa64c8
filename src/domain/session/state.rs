//! Attempt lifecycle and orchestration steps.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Where an analysis request currently is in its attempt chain.
///
/// - `Idle`: session created, nothing sent yet
/// - `Generating`: waiting on the model
/// - `Sanitizing`: extracting a candidate object from raw text
/// - `Validating`: structural and consistency checks
/// - `Retrying`: the last attempt failed and another one is allowed
/// - `Valid` / `Failed`: terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    #[default]
    Idle,
    Generating,
    Sanitizing,
    Validating,
    Retrying,
    Valid,
    Failed,
}

impl AttemptState {
    /// True while a step is running.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Generating | Self::Sanitizing | Self::Validating)
    }
}

impl StateMachine for AttemptState {
    fn valid_transitions(&self) -> Vec<Self> {
        use AttemptState::*;
        match self {
            Idle => vec![Generating],
            Generating => vec![Sanitizing, Retrying, Failed],
            Sanitizing => vec![Validating, Retrying, Failed],
            Validating => vec![Valid, Retrying, Failed],
            Retrying => vec![Generating],
            Valid | Failed => vec![],
        }
    }
}

/// The closed set of steps an orchestration runs per attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestrationStep {
    Generate,
    Sanitize,
    Validate,
    CheckConsistency,
}

impl OrchestrationStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Sanitize => "sanitize",
            Self::Validate => "validate",
            Self::CheckConsistency => "check_consistency",
        }
    }
}

impl fmt::Display for OrchestrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
