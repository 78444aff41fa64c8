//! GenerateAnalysisHandler - Turn a business idea into a validated analysis

use std::sync::Arc;

use crate::application::orchestration::{
    AnalysisOrchestrator, AnalysisOutcome, ModelSelection, OrchestrationError,
};
use crate::domain::analysis::Analysis;
use crate::domain::foundation::SessionId;

/// Command to analyze one business idea
#[derive(Debug, Clone, Default)]
pub struct GenerateAnalysisCommand {
    pub idea: String,
    /// Overrides the configured primary model for this request
    pub primary_model: Option<String>,
    /// Overrides the configured fallback model for this request
    pub fallback_model: Option<String>,
}

/// Result of a successful analysis
#[derive(Debug, Clone)]
pub struct GenerateAnalysisResult {
    pub session_id: SessionId,
    pub analysis: Analysis,
    pub attempts: u32,
    pub corrected: bool,
}

impl From<AnalysisOutcome> for GenerateAnalysisResult {
    fn from(outcome: AnalysisOutcome) -> Self {
        Self {
            session_id: outcome.session_id,
            analysis: outcome.analysis,
            attempts: outcome.attempts,
            corrected: outcome.corrected,
        }
    }
}

/// Error type for analysis generation
#[derive(Debug)]
pub enum GenerateAnalysisError {
    /// Idea is empty or whitespace only
    EmptyPrompt,
    /// Idea exceeds the configured length limit
    PromptTooLong { max: usize, actual: usize },
    /// Orchestration did not produce an analysis
    Failed(OrchestrationError),
}

impl GenerateAnalysisError {
    /// True when the caller sent a bad request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyPrompt | Self::PromptTooLong { .. })
    }
}

impl std::fmt::Display for GenerateAnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateAnalysisError::EmptyPrompt => write!(f, "prompt must not be empty"),
            GenerateAnalysisError::PromptTooLong { max, actual } => {
                write!(f, "prompt is {} characters, maximum is {}", actual, max)
            }
            GenerateAnalysisError::Failed(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GenerateAnalysisError {}

impl From<OrchestrationError> for GenerateAnalysisError {
    fn from(err: OrchestrationError) -> Self {
        GenerateAnalysisError::Failed(err)
    }
}

/// Handler for analysis generation
pub struct GenerateAnalysisHandler {
    orchestrator: Arc<AnalysisOrchestrator>,
    default_models: ModelSelection,
    max_prompt_chars: usize,
}

impl GenerateAnalysisHandler {
    pub fn new(
        orchestrator: Arc<AnalysisOrchestrator>,
        default_models: ModelSelection,
        max_prompt_chars: usize,
    ) -> Self {
        Self {
            orchestrator,
            default_models,
            max_prompt_chars,
        }
    }

    pub async fn handle(
        &self,
        cmd: GenerateAnalysisCommand,
    ) -> Result<GenerateAnalysisResult, GenerateAnalysisError> {
        // 1. Validate the idea
        let idea = cmd.idea.trim();
        if idea.is_empty() {
            return Err(GenerateAnalysisError::EmptyPrompt);
        }
        let length = idea.chars().count();
        if length > self.max_prompt_chars {
            return Err(GenerateAnalysisError::PromptTooLong {
                max: self.max_prompt_chars,
                actual: length,
            });
        }

        // 2. Resolve models
        let models = ModelSelection {
            primary: non_blank(cmd.primary_model).or_else(|| self.default_models.primary.clone()),
            fallback: non_blank(cmd.fallback_model)
                .or_else(|| self.default_models.fallback.clone()),
        };

        // 3. Orchestrate
        let outcome = self.orchestrator.analyze(idea, &models).await?;
        Ok(outcome.into())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
