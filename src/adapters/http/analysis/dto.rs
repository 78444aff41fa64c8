//! HTTP DTOs for the analysis endpoint.
//!
//! The success body is the `Analysis` itself; only the request envelope and
//! error body live here.

use serde::{Deserialize, Serialize};

use crate::application::handlers::GenerateAnalysisCommand;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to analyze a business idea.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub prompt: String,
    #[serde(default)]
    pub settings: Option<AnalyzeSettings>,
}

/// Optional per-request model overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeSettings {
    #[serde(default)]
    pub primary_model: Option<String>,
    #[serde(default)]
    pub fallback_model: Option<String>,
}

impl From<AnalyzeRequest> for GenerateAnalysisCommand {
    fn from(req: AnalyzeRequest) -> Self {
        let settings = req.settings.unwrap_or_default();
        Self {
            idea: req.prompt,
            primary_model: settings.primary_model,
            fallback_model: settings.fallback_model,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Error body. Never carries model output or validation issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn analysis_failed() -> Self {
        Self {
            error: "analysis failed".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_without_settings_deserializes() {
        let req: AnalyzeRequest = serde_json::from_str(r#"{"prompt": "Coffee"}"#).unwrap();
        assert_eq!(req.prompt, "Coffee");
        assert!(req.settings.is_none());
    }

    #[test]
    fn request_settings_use_camel_case() {
        let json = r#"{
            "prompt": "Coffee",
            "settings": {"primaryModel": "gpt-4o", "fallbackModel": "gpt-4o-mini"}
        }"#;
        let cmd: GenerateAnalysisCommand =
            serde_json::from_str::<AnalyzeRequest>(json).unwrap().into();

        assert_eq!(cmd.idea, "Coffee");
        assert_eq!(cmd.primary_model.as_deref(), Some("gpt-4o"));
        assert_eq!(cmd.fallback_model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn partial_settings_leave_other_model_unset() {
        let json = r#"{"prompt": "Coffee", "settings": {"fallbackModel": "small"}}"#;
        let cmd: GenerateAnalysisCommand =
            serde_json::from_str::<AnalyzeRequest>(json).unwrap().into();

        assert!(cmd.primary_model.is_none());
        assert_eq!(cmd.fallback_model.as_deref(), Some("small"));
    }

    #[test]
    fn missing_prompt_is_rejected() {
        assert!(serde_json::from_str::<AnalyzeRequest>(r#"{"settings": {}}"#).is_err());
    }

    #[test]
    fn failure_body_is_generic() {
        let body = serde_json::to_value(ErrorResponse::analysis_failed()).unwrap();
        assert_eq!(body, serde_json::json!({"error": "analysis failed"}));
    }
}
