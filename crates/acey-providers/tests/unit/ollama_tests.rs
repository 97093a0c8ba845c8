//! Ollama backend tests against a mock server

use acey_domain::error::Error;
use acey_domain::ports::SkillBackend;
use acey_domain::value_objects::{FailureKind, SkillRequest};
use acey_providers::OllamaBackend;
use mockito::{Matcher, Server};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

fn backend(url: String) -> OllamaBackend {
    OllamaBackend::new(
        url,
        "llama3.2".to_string(),
        Duration::from_secs(5),
        Client::new(),
    )
}

#[tokio::test]
async fn test_generate_success() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama3.2",
            "prompt": "write a haiku",
            "stream": false
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"response": "leaves fall", "done_reason": "stop"}).to_string())
        .create_async()
        .await;

    let request = SkillRequest::new("poetry", json!({"prompt": "write a haiku"}));
    let response = backend(server.url()).invoke(&request).await.unwrap();

    assert!(response.success);
    assert_eq!(response.output["text"], "leaves fall");
    assert_eq!(response.output["model"], "llama3.2");
    assert!((response.confidence - 0.9).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_truncated_completion_lowers_confidence() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body(json!({"response": "partial", "done_reason": "length"}).to_string())
        .create_async()
        .await;

    let request = SkillRequest::new("poetry", json!("long poem"));
    let response = backend(server.url()).invoke(&request).await.unwrap();

    assert!((response.confidence - 0.6).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_missing_model_is_typed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(404)
        .with_body(r#"{"error":"model 'llama3.2' not found"}"#)
        .create_async()
        .await;

    let request = SkillRequest::new("poetry", json!("x"));
    let err = backend(server.url()).invoke(&request).await.unwrap_err();

    assert_eq!(err.failure_kind(), FailureKind::ModelNotFound);
    assert!(matches!(err, Error::Backend { .. }));
}

#[tokio::test]
async fn test_malformed_body_is_other() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body(json!({"unexpected": true}).to_string())
        .create_async()
        .await;

    let request = SkillRequest::new("poetry", json!("x"));
    let err = backend(server.url()).invoke(&request).await.unwrap_err();

    assert_eq!(err.failure_kind(), FailureKind::Other);
}

#[tokio::test]
async fn test_unreachable_server_is_connection_refused() {
    let request = SkillRequest::new("poetry", json!("x"));
    let err = backend("http://127.0.0.1:1".to_string())
        .invoke(&request)
        .await
        .unwrap_err();

    assert_eq!(err.failure_kind(), FailureKind::ConnectionRefused);
}
