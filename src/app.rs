//! Composition root: wires configuration, provider, orchestrator and router.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::adapters::ai::{
    AnthropicConfig, AnthropicProvider, MockAIProvider, OpenAIConfig, OpenAIProvider,
};
use crate::adapters::http::{analysis_router, AnalysisAppState};
use crate::adapters::storage::InMemorySessionStore;
use crate::application::handlers::GenerateAnalysisHandler;
use crate::application::orchestration::{
    AnalysisOrchestrator, ModelSelection, OrchestratorSettings,
};
use crate::config::{AiConfig, AiProvider, AppConfig, ServerConfig};
use crate::ports::{AIError, AIProvider};

/// Builds the model provider selected in `config`.
pub fn build_provider(config: &AiConfig) -> Result<Arc<dyn AIProvider>, AIError> {
    let provider: Arc<dyn AIProvider> = match config.provider {
        AiProvider::OpenAI => {
            let key = config
                .openai_api_key
                .clone()
                .ok_or(AIError::AuthenticationFailed)?;
            let mut provider_config = OpenAIConfig::new(key).with_timeout(config.http_timeout());
            if let Some(model) = &config.primary_model {
                provider_config = provider_config.with_model(model.as_str());
            }
            if let Some(url) = &config.base_url {
                provider_config = provider_config.with_base_url(url.as_str());
            }
            Arc::new(OpenAIProvider::new(provider_config)?)
        }
        AiProvider::Anthropic => {
            let key = config
                .anthropic_api_key
                .clone()
                .ok_or(AIError::AuthenticationFailed)?;
            let mut provider_config =
                AnthropicConfig::new(key).with_timeout(config.http_timeout());
            if let Some(model) = &config.primary_model {
                provider_config = provider_config.with_model(model.as_str());
            }
            if let Some(url) = &config.base_url {
                provider_config = provider_config.with_base_url(url.as_str());
            }
            Arc::new(AnthropicProvider::new(provider_config)?)
        }
        AiProvider::Mock => Arc::new(MockAIProvider::new()),
    };

    let info = provider.provider_info();
    tracing::info!(provider = %info.name, model = %info.model, "Model provider ready");
    Ok(provider)
}

/// Builds the HTTP application around `provider`.
pub fn build_router(config: &AppConfig, provider: Arc<dyn AIProvider>) -> Router {
    let orchestrator = AnalysisOrchestrator::new(
        provider,
        Arc::new(InMemorySessionStore::new()),
        OrchestratorSettings::from(&config.orchestration),
    );
    let default_models = ModelSelection {
        primary: config.ai.primary_model.clone(),
        fallback: config.ai.fallback_model.clone(),
    };
    let handler = GenerateAnalysisHandler::new(
        Arc::new(orchestrator),
        default_models,
        config.orchestration.max_prompt_chars,
    );

    analysis_router(AnalysisAppState::new(Arc::new(handler))).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.server))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            ))),
    )
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins = server.cors_origins_list();
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_provider_needs_no_credentials() {
        let config = AiConfig {
            provider: AiProvider::Mock,
            ..Default::default()
        };
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.provider_info().name, "mock");
    }

    #[test]
    fn missing_key_fails_provider_construction() {
        let config = AiConfig {
            provider: AiProvider::OpenAI,
            openai_api_key: None,
            ..Default::default()
        };
        assert!(matches!(
            build_provider(&config),
            Err(AIError::AuthenticationFailed)
        ));
    }
}
