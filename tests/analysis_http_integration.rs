//! Integration tests for the analysis HTTP endpoint.
//!
//! Drives the full router (layers included) with `oneshot` requests and a
//! scripted provider.

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use idea_lens::adapters::ai::{MockAIProvider, MockError};
use idea_lens::app::build_router;
use idea_lens::config::AppConfig;

use common::{analysis_doc, valid_doc, IDEA};

fn app(provider: &MockAIProvider) -> Router {
    let mut config = AppConfig::default();
    config.orchestration.max_prompt_chars = 200;
    build_router(&config, Arc::new(provider.clone()))
}

fn analyze_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn valid_analysis_is_returned_as_json() {
    let provider = MockAIProvider::new().with_response(valid_doc().to_string());

    let (status, body) = send(app(&provider), analyze_request(json!({"prompt": IDEA}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["validationScore"], 72);
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["sources"].as_array().unwrap().len(), 15);
}

#[tokio::test]
async fn request_settings_select_the_models() {
    let provider = MockAIProvider::new()
        .with_error(MockError::Unavailable {
            message: "overloaded".into(),
        })
        .with_response(valid_doc().to_string());
    let body = json!({
        "prompt": IDEA,
        "settings": {"primaryModel": "model-a", "fallbackModel": "model-b"}
    });

    let (status, _) = send(app(&provider), analyze_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    let calls = provider.get_calls();
    assert_eq!(calls[0].model.as_deref(), Some("model-a"));
    assert_eq!(calls[1].model.as_deref(), Some("model-b"));
}

#[tokio::test]
async fn exhausted_retries_return_generic_error() {
    let provider = MockAIProvider::new()
        .with_response(analysis_doc(3).to_string())
        .with_response(analysis_doc(4).to_string())
        .with_response(analysis_doc(5).to_string());

    let (status, body) = send(app(&provider), analyze_request(json!({"prompt": IDEA}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "analysis failed"}));
    assert_eq!(provider.call_count(), 3);
}

#[tokio::test]
async fn blank_prompt_is_bad_request() {
    let provider = MockAIProvider::new();

    let (status, body) = send(app(&provider), analyze_request(json!({"prompt": "  "}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "prompt must not be empty");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn oversized_prompt_is_bad_request() {
    let provider = MockAIProvider::new();

    let (status, body) = send(
        app(&provider),
        analyze_request(json!({"prompt": "x".repeat(201)})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "prompt is 201 characters, maximum is 200");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let provider = MockAIProvider::new();
    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(app(&provider), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let provider = MockAIProvider::new();
    let request = Request::builder()
        .uri("/api/unknown")
        .body(Body::empty())
        .unwrap();

    let response = app(&provider).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
