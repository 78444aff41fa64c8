//! AnalysisOrchestrator - drives generate, sanitize, validate and
//! check-consistency with a bounded retry loop.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use super::errors::{AttemptFailure, OrchestrationError};
use super::lease::SessionLease;
use super::prompts;
use crate::config::OrchestrationConfig;
use crate::domain::analysis::{
    Analysis, ConsistencyChecker, ResponseSanitizer, StructuralValidator,
};
use crate::domain::foundation::{SessionId, TransitionError};
use crate::domain::session::{
    AnalysisSession, AttemptState, OrchestrationStep, SessionMetadata, SessionRole,
    ValidationStatus,
};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, FinishReason, MessageRole, RequestMetadata,
    SessionStore, SessionStoreError,
};

/// Tunables for one orchestrator instance.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorSettings {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub model_timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
    pub skip_currency_check: bool,
}

impl From<&OrchestrationConfig> for OrchestratorSettings {
    fn from(config: &OrchestrationConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            model_timeout: config.model_timeout(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            skip_currency_check: config.skip_currency_check,
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from(&OrchestrationConfig::default())
    }
}

/// Models requested for one analysis. `None` defers to the provider default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSelection {
    pub primary: Option<String>,
    /// Used for the remaining attempts after a provider failure.
    pub fallback: Option<String>,
}

/// A validated analysis and how it was obtained.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub session_id: SessionId,
    pub analysis: Analysis,
    /// 1-based attempt that succeeded.
    pub attempts: u32,
    /// True when consistency corrections were applied.
    pub corrected: bool,
    /// Model that produced the accepted answer, as reported by the provider.
    pub model: Option<String>,
}

/// Previous answer and its issues, replayed on the next attempt.
struct Feedback {
    previous_output: String,
    issues: Vec<String>,
}

struct Checked {
    analysis: Analysis,
    corrected: bool,
}

enum StepError {
    Retryable(AttemptFailure),
    Fatal(OrchestrationError),
}

impl From<AttemptFailure> for StepError {
    fn from(failure: AttemptFailure) -> Self {
        Self::Retryable(failure)
    }
}

impl From<SessionStoreError> for StepError {
    fn from(err: SessionStoreError) -> Self {
        Self::Fatal(err.into())
    }
}

impl From<TransitionError> for StepError {
    fn from(err: TransitionError) -> Self {
        Self::Fatal(err.into())
    }
}

/// Turns a business idea into a validated `Analysis`.
///
/// Each call owns one session for its whole lifetime. Unrelated calls share
/// only the session store and may run concurrently.
pub struct AnalysisOrchestrator {
    provider: Arc<dyn AIProvider>,
    sessions: Arc<dyn SessionStore>,
    sanitizer: ResponseSanitizer,
    validator: StructuralValidator,
    settings: OrchestratorSettings,
}

impl AnalysisOrchestrator {
    pub fn new(
        provider: Arc<dyn AIProvider>,
        sessions: Arc<dyn SessionStore>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            provider,
            sessions,
            sanitizer: ResponseSanitizer::new(),
            validator: StructuralValidator::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Runs the attempt chain for `idea`.
    ///
    /// # Errors
    ///
    /// - `RetriesExhausted` when every allowed attempt failed
    /// - `Session` / `State` when session bookkeeping itself breaks
    pub async fn analyze(
        &self,
        idea: &str,
        models: &ModelSelection,
    ) -> Result<AnalysisOutcome, OrchestrationError> {
        let session_id = SessionId::new();
        let mut session = AnalysisSession::new(
            session_id,
            SessionMetadata {
                skip_currency_check: self.settings.skip_currency_check,
                ..Default::default()
            },
        );
        session.push_message(SessionRole::System, prompts::system_prompt());
        session.push_message(SessionRole::User, idea);
        self.sessions.create(session.clone())?;
        let _lease = SessionLease::new(Arc::clone(&self.sessions), session_id);

        let checker =
            ConsistencyChecker::new().skip_currency_check(self.settings.skip_currency_check);
        let max_attempts = self.settings.max_retries + 1;
        let mut model = models.primary.clone();
        let mut feedback: Option<Feedback> = None;
        let mut all_issues = Vec::new();

        tracing::info!(
            session_id = %session_id,
            max_attempts,
            provider = %self.provider.provider_info().name,
            "Starting analysis"
        );

        for attempt in 1..=max_attempts {
            let span = tracing::info_span!(
                "analysis_attempt",
                session_id = %session_id,
                attempt,
                model = model.as_deref().unwrap_or("default"),
            );
            let mut raw_output = None;

            let result = self
                .run_attempt(
                    &mut session,
                    idea,
                    model.as_deref(),
                    feedback.as_ref(),
                    &checker,
                    &mut raw_output,
                )
                .instrument(span.clone())
                .await;

            let failure = match result {
                Ok(checked) => {
                    session.transition(AttemptState::Valid)?;
                    session.set_last_analysis(checked.analysis.clone());
                    self.sessions.save(&session)?;
                    span.in_scope(|| {
                        tracing::info!(corrected = checked.corrected, "Analysis accepted")
                    });

                    return Ok(AnalysisOutcome {
                        session_id,
                        analysis: checked.analysis,
                        attempts: attempt,
                        corrected: checked.corrected,
                        model: session.metadata().model.clone(),
                    });
                }
                Err(StepError::Fatal(err)) => {
                    tracing::error!(session_id = %session_id, error = %err, "Orchestration aborted");
                    return Err(err);
                }
                Err(StepError::Retryable(failure)) => failure,
            };

            let issues = failure.issues();
            span.in_scope(|| {
                tracing::warn!(
                    kind = failure.kind(),
                    issue_count = issues.len(),
                    error = %failure,
                    "Attempt failed"
                )
            });
            session.push_message(
                SessionRole::Assistant,
                format!("attempt {} failed ({}): {}", attempt, failure.kind(), issues.join("; ")),
            );
            all_issues.extend(issues.iter().map(|i| format!("attempt {}: {}", attempt, i)));

            if attempt == max_attempts {
                session.transition(AttemptState::Failed)?;
                self.sessions.save(&session)?;
                tracing::error!(
                    session_id = %session_id,
                    attempts = attempt,
                    "Analysis failed, retries exhausted"
                );
                return Err(OrchestrationError::RetriesExhausted {
                    attempts: attempt,
                    issues: all_issues,
                });
            }

            session.transition(AttemptState::Retrying)?;
            if failure.is_model_output_problem() {
                feedback = raw_output.map(|previous_output| Feedback {
                    previous_output,
                    issues,
                });
            } else if let Some(fallback) = &models.fallback {
                if model.as_ref() != Some(fallback) {
                    tracing::info!(
                        session_id = %session_id,
                        fallback = %fallback,
                        "Switching to fallback model"
                    );
                    model = Some(fallback.clone());
                }
            }
            self.sessions.save(&session)?;
        }

        Err(OrchestrationError::RetriesExhausted {
            attempts: max_attempts,
            issues: all_issues,
        })
    }

    async fn run_attempt(
        &self,
        session: &mut AnalysisSession,
        idea: &str,
        model: Option<&str>,
        feedback: Option<&Feedback>,
        checker: &ConsistencyChecker,
        raw_output: &mut Option<String>,
    ) -> Result<Checked, StepError> {
        // Generate
        session.transition(AttemptState::Generating)?;
        session.record_invocation(
            OrchestrationStep::Generate,
            format!("model={}", model.unwrap_or("default")),
        );
        self.sessions.save(session)?;

        let request = self.build_request(session.id(), idea, model, feedback);
        let timeout = self.settings.model_timeout;
        let response = match tokio::time::timeout(timeout, self.provider.complete(request)).await
        {
            Ok(result) => result.map_err(AttemptFailure::from)?,
            Err(_) => return Err(AttemptFailure::from(AIError::timeout(timeout.as_secs())).into()),
        };

        if response.finish_reason == FinishReason::Length {
            tracing::warn!(model = %response.model, "Model output hit the token limit");
        }
        session.set_model(response.model.as_str());
        session.record_result(
            OrchestrationStep::Generate,
            format!(
                "{} chars from {}, finish_reason={:?}",
                response.content.len(),
                response.model,
                response.finish_reason
            ),
        );
        let raw = raw_output.insert(response.content);

        // Sanitize
        session.transition(AttemptState::Sanitizing)?;
        session.record_invocation(OrchestrationStep::Sanitize, format!("{} chars", raw.len()));
        self.sessions.save(session)?;

        let candidate = self.sanitizer.sanitize(raw).map_err(AttemptFailure::from)?;
        let value: Value = serde_json::from_str(&candidate)
            .map_err(|e| AttemptFailure::InvalidJson(e.to_string()))?;
        session.record_result(
            OrchestrationStep::Sanitize,
            format!("{} chars of JSON", candidate.len()),
        );

        // Validate
        session.transition(AttemptState::Validating)?;
        session.record_invocation(OrchestrationStep::Validate, "structural rules");
        self.sessions.save(session)?;

        let analysis = match self.validator.validate_and_decode(value) {
            Ok(analysis) => analysis,
            Err(report) => {
                session.set_validation_status(ValidationStatus::Invalid);
                return Err(AttemptFailure::StructuralValidationFailed(report.issues).into());
            }
        };
        session.record_result(OrchestrationStep::Validate, "valid");
        session.set_last_analysis(analysis.clone());

        // Check consistency
        session.record_invocation(OrchestrationStep::CheckConsistency, "cross-field rules");
        let report = checker.check(&analysis);
        if report.is_consistent() {
            session.set_validation_status(ValidationStatus::Valid);
            session.record_result(OrchestrationStep::CheckConsistency, "consistent");
            return Ok(Checked {
                analysis,
                corrected: false,
            });
        }

        match report.corrected {
            Some(corrected) => {
                session.set_validation_status(ValidationStatus::Corrected);
                session.record_result(
                    OrchestrationStep::CheckConsistency,
                    format!("corrected: {}", report.issues.join("; ")),
                );
                Ok(Checked {
                    analysis: corrected,
                    corrected: true,
                })
            }
            None => {
                session.set_validation_status(ValidationStatus::Invalid);
                Err(AttemptFailure::ConsistencyUncorrectable(report.issues).into())
            }
        }
    }

    fn build_request(
        &self,
        session_id: SessionId,
        idea: &str,
        model: Option<&str>,
        feedback: Option<&Feedback>,
    ) -> CompletionRequest {
        let metadata = RequestMetadata::new(session_id, Uuid::new_v4().to_string());
        let mut request = CompletionRequest::new(metadata)
            .with_system_prompt(prompts::system_prompt())
            .with_message(MessageRole::User, prompts::idea_prompt(idea))
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature);

        if let Some(feedback) = feedback {
            request = request
                .with_message(
                    MessageRole::Assistant,
                    prompts::echoed_output(&feedback.previous_output),
                )
                .with_message(MessageRole::User, prompts::retry_feedback(&feedback.issues));
        }
        if let Some(model) = model {
            request = request.with_model(model);
        }
        request
    }
}
