//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Mock AI provider is not allowed in production")]
    MockProviderInProduction,

    #[error("Invalid model name for {0}")]
    InvalidModelName(&'static str),

    #[error("max_retries must be at most {max}, got {actual}")]
    TooManyRetries { max: u32, actual: u32 },

    #[error("Model call timeout must be between 1 and {max} seconds")]
    InvalidModelTimeout { max: u64 },

    #[error("Temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("Request timeout of {request_timeout_secs}s does not cover the {attempt_budget_secs}s model attempt budget")]
    RequestTimeoutBelowAttemptBudget {
        request_timeout_secs: u64,
        attempt_budget_secs: u64,
    },

    #[error("{0} must be greater than zero")]
    MustBePositive(&'static str),
}
