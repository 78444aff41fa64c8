//! Orchestration configuration: retry bound, model-call timeout, sampling

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound on configured retries.
pub const MAX_ALLOWED_RETRIES: u32 = 10;

/// Upper bound on the per-call model timeout, in seconds.
pub const MAX_MODEL_TIMEOUT_SECS: u64 = 600;

/// Orchestration configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OrchestrationConfig {
    /// Retries after the initial attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Timeout for one model call, in seconds
    #[serde(default = "default_model_timeout")]
    pub model_timeout_secs: u64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum accepted idea prompt length, in characters
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,

    /// Disables the currency uniformity check
    #[serde(default)]
    pub skip_currency_check: bool,
}

impl OrchestrationConfig {
    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    /// Total attempts including the first one
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Worst-case time spent waiting on the model across every attempt
    pub fn attempt_budget_secs(&self) -> u64 {
        u64::from(self.max_attempts()) * self.model_timeout_secs
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_retries > MAX_ALLOWED_RETRIES {
            return Err(ValidationError::TooManyRetries {
                max: MAX_ALLOWED_RETRIES,
                actual: self.max_retries,
            });
        }
        if self.model_timeout_secs == 0 || self.model_timeout_secs > MAX_MODEL_TIMEOUT_SECS {
            return Err(ValidationError::InvalidModelTimeout {
                max: MAX_MODEL_TIMEOUT_SECS,
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::MustBePositive("max_tokens"));
        }
        if self.max_prompt_chars == 0 {
            return Err(ValidationError::MustBePositive("max_prompt_chars"));
        }
        Ok(())
    }
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            model_timeout_secs: default_model_timeout(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_prompt_chars: default_max_prompt_chars(),
            skip_currency_check: false,
        }
    }
}

fn default_max_retries() -> u32 {
    2
}

fn default_model_timeout() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_temperature() -> f32 {
    0.4
}

fn default_max_prompt_chars() -> usize {
    4000
}
