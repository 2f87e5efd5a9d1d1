/// Integration tests for the AI endpoints against a mock provider
///
/// Requires PostgreSQL at DATABASE_URL. The provider is a local wiremock
/// server speaking the chat completions format.

mod common;

use axum::http::{Method, StatusCode};
use common::TestContext;
use quillpress_shared::ai::{
    openai::{AiConfig, OpenAiClient},
    AiAssistant,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::{
    matchers::{bearer_token, method, path},
    Mock, MockServer, ResponseTemplate,
};

async fn provider_replying(reply: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("mock-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": reply } }]
        })))
        .mount(&server)
        .await;
    server
}

async fn context_for(server: &MockServer) -> TestContext {
    let client = OpenAiClient::new(AiConfig {
        api_key: "mock-key".to_string(),
        base_url: format!("{}/v1", server.uri()),
        model: "mock-model".to_string(),
        timeout_seconds: 5,
    })
    .unwrap();

    TestContext::with_ai(AiAssistant::new(Arc::new(client)))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_improve_relays_reply() {
    let server = provider_replying("<p>Sharper prose.</p>").await;
    let ctx = context_for(&server).await;

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/ai/improve",
            Some(json!({ "content": "<p>prose</p>" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body, json!({ "improvedContent": "<p>Sharper prose.</p>" }));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_summary_and_title() {
    let server = provider_replying("\"Borrowing Without Tears\"").await;
    let ctx = context_for(&server).await;

    let (status, body) = ctx
        .send(Method::POST, "/api/ai/suggest-title", Some(json!({ "content": "..." })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Borrowing Without Tears");

    let (status, body) = ctx
        .send(Method::POST, "/api/ai/summary", Some(json!({ "content": "..." })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], "\"Borrowing Without Tears\"");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_suggest_tags_are_normalized() {
    let server = provider_replying("Rust, #Tokio, rust, Async IO").await;
    let ctx = context_for(&server).await;

    let (status, body) = ctx
        .send(Method::POST, "/api/ai/suggest-tags", Some(json!({ "content": "..." })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tags"], json!(["rust", "tokio", "async io"]));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_missing_content_is_bad_request() {
    let server = provider_replying("unused").await;
    let ctx = context_for(&server).await;

    for body in [json!({}), json!({ "content": "   " }), json!({ "content": null })] {
        let (status, response) = ctx.send(Method::POST, "/api/ai/summary", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["message"], "Content is required");
    }

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_requires_auth() {
    let server = provider_replying("unused").await;
    let ctx = context_for(&server).await;

    let (status, _) = ctx
        .send_as(
            None,
            Method::POST,
            "/api/ai/improve",
            Some(json!({ "content": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_provider_failure_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "message": "model overloaded" }
        })))
        .mount(&server)
        .await;
    let ctx = context_for(&server).await;

    let (status, body) = ctx
        .send(Method::POST, "/api/ai/improve", Some(json!({ "content": "x" })))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "AI service returned 500: model overloaded");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_unconfigured_provider_is_server_error() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .send(Method::POST, "/api/ai/suggest-tags", Some(json!({ "content": "x" })))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "AI service is not configured");

    ctx.cleanup().await.unwrap();
}
