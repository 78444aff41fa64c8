//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `IDEA_LENS` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use idea_lens::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod error;
mod orchestration;
mod server;

pub use ai::{AiConfig, AiProvider};
pub use error::{ConfigError, ValidationError};
pub use orchestration::{OrchestrationConfig, MAX_ALLOWED_RETRIES, MAX_MODEL_TIMEOUT_SECS};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "IDEA_LENS";

/// Root application configuration
///
/// Every section has defaults; only provider credentials are required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub orchestration: OrchestrationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` if present (development)
    /// 2. Reads variables with the `IDEA_LENS` prefix
    /// 3. Splits nested keys on `__`
    ///
    /// - `IDEA_LENS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `IDEA_LENS__ORCHESTRATION__MAX_RETRIES=2` -> `orchestration.max_retries = 2`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate(self.server.is_production())?;
        self.orchestration.validate()?;

        // The request timeout must outlast every model attempt.
        let attempt_budget_secs = self.orchestration.attempt_budget_secs();
        if self.server.request_timeout_secs <= attempt_budget_secs {
            return Err(ValidationError::RequestTimeoutBelowAttemptBudget {
                request_timeout_secs: self.server.request_timeout_secs,
                attempt_budget_secs,
            });
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 7] = [
        "IDEA_LENS__AI__ANTHROPIC_API_KEY",
        "IDEA_LENS__AI__PROVIDER",
        "IDEA_LENS__AI__FALLBACK_MODEL",
        "IDEA_LENS__SERVER__PORT",
        "IDEA_LENS__SERVER__ENVIRONMENT",
        "IDEA_LENS__SERVER__REQUEST_TIMEOUT_SECS",
        "IDEA_LENS__ORCHESTRATION__MAX_RETRIES",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_defaults_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.orchestration.max_retries, 2);
        assert_eq!(config.ai.provider, AiProvider::Anthropic);
    }

    #[test]
    fn test_load_nested_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("IDEA_LENS__AI__ANTHROPIC_API_KEY", "sk-ant-xxx"),
            ("IDEA_LENS__AI__FALLBACK_MODEL", "claude-3-5-haiku-latest"),
            ("IDEA_LENS__SERVER__PORT", "3000"),
            ("IDEA_LENS__SERVER__REQUEST_TIMEOUT_SECS", "360"),
            ("IDEA_LENS__ORCHESTRATION__MAX_RETRIES", "4"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.request_timeout_secs, 360);
        assert_eq!(config.orchestration.max_retries, 4);
        assert_eq!(
            config.ai.fallback_model.as_deref(),
            Some("claude-3-5-haiku-latest")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_request_timeout_must_exceed_attempt_budget() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("IDEA_LENS__AI__ANTHROPIC_API_KEY", "sk-ant-xxx"),
            ("IDEA_LENS__ORCHESTRATION__MAX_RETRIES", "4"),
        ])
        .unwrap();

        assert_eq!(
            config.validate(),
            Err(ValidationError::RequestTimeoutBelowAttemptBudget {
                request_timeout_secs: 240,
                attempt_budget_secs: 300,
            })
        );
    }

    #[test]
    fn test_default_attempt_budget_fits_request_timeout() {
        let mut config = AppConfig::default();
        config.ai.anthropic_api_key = Some("sk-ant-xxx".into());

        assert_eq!(config.orchestration.attempt_budget_secs(), 180);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mock_provider_rejected_in_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("IDEA_LENS__AI__PROVIDER", "mock"),
            ("IDEA_LENS__SERVER__ENVIRONMENT", "production"),
        ])
        .unwrap();

        assert!(config.is_production());
        assert_eq!(
            config.validate(),
            Err(ValidationError::MockProviderInProduction)
        );
    }

    #[test]
    fn test_missing_credentials_fail_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))
        );
    }
}
