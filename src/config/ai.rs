//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub openai_api_key: Option<String>,

    pub anthropic_api_key: Option<String>,

    /// Provider that serves every analysis request
    #[serde(default)]
    pub provider: AiProvider,

    /// Model used when a request does not name one
    pub primary_model: Option<String>,

    /// Model used after a provider failure when a request does not name one
    pub fallback_model: Option<String>,

    /// Overrides the provider's API base URL (proxies, local gateways)
    pub base_url: Option<String>,

    /// HTTP client timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAI,
    #[default]
    Anthropic,
    /// Scripted provider for local runs without credentials
    Mock,
}

impl AiConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        match self.provider {
            AiProvider::OpenAI if !self.has_openai() => {
                return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
            }
            AiProvider::Anthropic if !self.has_anthropic() => {
                return Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"));
            }
            AiProvider::Mock if production => {
                return Err(ValidationError::MockProviderInProduction);
            }
            _ => {}
        }

        if self.primary_model.as_ref().is_some_and(|m| m.trim().is_empty()) {
            return Err(ValidationError::InvalidModelName("primary_model"));
        }
        if self.fallback_model.as_ref().is_some_and(|m| m.trim().is_empty()) {
            return Err(ValidationError::InvalidModelName("fallback_model"));
        }
        if self.http_timeout_secs == 0 {
            return Err(ValidationError::MustBePositive("http_timeout_secs"));
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            provider: AiProvider::default(),
            primary_model: None,
            fallback_model: None,
            base_url: None,
            http_timeout_secs: default_http_timeout(),
        }
    }
}

fn default_http_timeout() -> u64 {
    90
}
