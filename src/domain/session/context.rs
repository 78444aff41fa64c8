//! Per-request analysis session.
//!
//! A session lives exactly as long as one orchestration call. It records
//! every step as an append-only history so failures can be diagnosed.

use serde::Serialize;

use super::state::{AttemptState, OrchestrationStep};
use crate::domain::analysis::Analysis;
use crate::domain::foundation::{SessionId, StateMachine, Timestamp, TransitionError};

/// Author of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionRole {
    System,
    User,
    /// A step invocation issued by the orchestrator.
    Tool,
    /// The outcome of a step or a model reply.
    Assistant,
}

/// One immutable history entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionMessage {
    pub role: SessionRole,
    pub content: String,
    pub timestamp: Timestamp,
}

/// Outcome of the most recent validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Valid,
    Corrected,
    Invalid,
}

/// Fixed metadata record carried by every session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionMetadata {
    pub last_validation: Option<ValidationStatus>,
    pub skip_currency_check: bool,
    /// Model serving the current attempt.
    pub model: Option<String>,
}

/// Ephemeral state for one analysis request.
///
/// # Invariants
///
/// - `history` is append-only and ordered by step
/// - `state` only changes through legal `AttemptState` transitions
/// - `retry_count` never decreases
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSession {
    id: SessionId,
    state: AttemptState,
    history: Vec<SessionMessage>,
    retry_count: u32,
    last_analysis: Option<Analysis>,
    metadata: SessionMetadata,
    created_at: Timestamp,
}

impl AnalysisSession {
    pub fn new(id: SessionId, metadata: SessionMetadata) -> Self {
        Self {
            id,
            state: AttemptState::Idle,
            history: Vec::new(),
            retry_count: 0,
            last_analysis: None,
            metadata,
            created_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn history(&self) -> &[SessionMessage] {
        &self.history
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn last_analysis(&self) -> Option<&Analysis> {
        self.last_analysis.as_ref()
    }

    pub fn metadata(&self) -> &SessionMetadata {
        &self.metadata
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Moves to `next`, rejecting illegal transitions.
    ///
    /// Entering `Retrying` bumps the retry counter.
    pub fn transition(&mut self, next: AttemptState) -> Result<(), TransitionError> {
        self.state = self.state.transition_to(next)?;
        if next == AttemptState::Retrying {
            self.retry_count += 1;
        }
        Ok(())
    }

    pub fn push_message(&mut self, role: SessionRole, content: impl Into<String>) {
        self.history.push(SessionMessage {
            role,
            content: content.into(),
            timestamp: Timestamp::now(),
        });
    }

    /// Records that `step` was invoked.
    pub fn record_invocation(&mut self, step: OrchestrationStep, detail: impl AsRef<str>) {
        self.push_message(SessionRole::Tool, format!("{}: {}", step, detail.as_ref()));
    }

    /// Records what `step` produced.
    pub fn record_result(&mut self, step: OrchestrationStep, detail: impl AsRef<str>) {
        self.push_message(
            SessionRole::Assistant,
            format!("{}: {}", step, detail.as_ref()),
        );
    }

    pub fn set_last_analysis(&mut self, analysis: Analysis) {
        self.last_analysis = Some(analysis);
    }

    pub fn set_validation_status(&mut self, status: ValidationStatus) {
        self.metadata.last_validation = Some(status);
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.metadata.model = Some(model.into());
    }
}
