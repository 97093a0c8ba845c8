//! Execution gateway tests

use crate::test_utils::{Reply, ScriptedBackend};
use acey_application::{ExecutionGateway, GatewaySettings};
use acey_domain::value_objects::{
    FailureKind, Provider, SkillRequest, TrustContext, TrustLevel,
};
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn gateway(backend: ScriptedBackend, settings: GatewaySettings) -> (Arc<ScriptedBackend>, ExecutionGateway) {
    let backend = Arc::new(backend);
    let gateway = ExecutionGateway::new(backend.clone(), settings);
    (backend, gateway)
}

fn provider(name: &str) -> Provider {
    Provider::remote(name).with_capabilities(["all"])
}

fn request() -> SkillRequest {
    SkillRequest::new("chat", json!("hello"))
}

#[tokio::test]
async fn test_success_carries_quality_and_cost() {
    let (_, gateway) = gateway(
        ScriptedBackend::new().always("p", Reply::ok_with(json!("done"), 0.5, 2_000)),
        GatewaySettings::default(),
    );
    let outcome = gateway
        .execute(&request(), &provider("p").with_cost_per_call(0.02))
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.output, Some(json!("done")));
    assert!((outcome.quality - 0.8).abs() < 1e-9);
    assert!((outcome.cost_incurred - 0.02).abs() < 1e-9);
    assert_eq!(outcome.duration_ms, 2_000);
}

#[tokio::test]
async fn test_confidence_is_clamped() {
    let (_, gateway) = gateway(
        ScriptedBackend::new().always("p", Reply::ok_with(json!("x"), 1.7, 100)),
        GatewaySettings::default(),
    );
    let outcome = gateway.execute(&request(), &provider("p")).await;
    assert!((outcome.confidence - 1.0).abs() < f64::EPSILON);
    assert!(outcome.quality <= 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_provider_timeout_produces_timeout_failure() {
    let (_, gateway) = gateway(
        ScriptedBackend::new()
            .always("slow", Reply::ok(json!("late")))
            .delay("slow", Duration::from_millis(500)),
        GatewaySettings::default(),
    );
    let outcome = gateway
        .execute(&request(), &provider("slow").with_timeout_ms(50))
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.failure_kind, Some(FailureKind::Timeout));
    assert_eq!(outcome.message(), "execution timeout after 50ms");
    assert!(outcome.quality.abs() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn test_default_timeout_applies_without_provider_timeout() {
    let settings = GatewaySettings {
        default_timeout_ms: 100,
        ..GatewaySettings::default()
    };
    let (_, gateway) = gateway(
        ScriptedBackend::new()
            .always("slow", Reply::ok(json!("late")))
            .delay("slow", Duration::from_secs(1)),
        settings,
    );
    let outcome = gateway.execute(&request(), &provider("slow")).await;
    assert_eq!(outcome.failure_kind, Some(FailureKind::Timeout));
}

#[tokio::test]
async fn test_backend_errors_and_failed_responses_are_classified() {
    let (_, gateway) = gateway(
        ScriptedBackend::new()
            .then("p", Reply::error(FailureKind::RateLimit, "rate limit exceeded"))
            .then("p", Reply::failed(FailureKind::ModelNotFound, "no such model")),
        GatewaySettings::default(),
    );

    let first = gateway.execute(&request(), &provider("p")).await;
    assert_eq!(first.failure_kind, Some(FailureKind::RateLimit));
    assert!(first.message().contains("rate limit exceeded"));

    let second = gateway.execute(&request(), &provider("p")).await;
    assert_eq!(second.failure_kind, Some(FailureKind::ModelNotFound));
    assert_eq!(second.message(), "no such model");
}

#[tokio::test]
async fn test_output_over_budget_is_limit_exceeded() {
    let (_, gateway) = gateway(
        ScriptedBackend::new().always("p", Reply::ok(json!("x".repeat(100)))),
        GatewaySettings::default(),
    );
    let outcome = gateway
        .execute(&request(), &provider("p").with_max_output_units(2))
        .await;
    assert!(!outcome.success);
    assert_eq!(outcome.failure_kind, Some(FailureKind::LimitExceeded));
}

#[tokio::test]
async fn test_learning_log_keeps_only_permitted_high_quality_outcomes() {
    let (_, gateway) = gateway(
        ScriptedBackend::new()
            .then("p", Reply::ok_with(json!("good"), 0.9, 100))
            .then("p", Reply::ok_with(json!("poor"), 0.0, 6_000))
            .then("p", Reply::ok_with(json!("denied"), 0.9, 100)),
        GatewaySettings::default(),
    );
    let p = provider("p");

    gateway.execute(&request(), &p).await;
    gateway.execute(&request(), &p).await;
    let denied = request().with_trust(TrustContext::denied(TrustLevel::Untrusted));
    gateway.execute(&denied, &p).await;

    let log = gateway.learning_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].output, Some(json!("good")));
}

#[tokio::test]
async fn test_learning_log_is_bounded() {
    let settings = GatewaySettings {
        learning_log_capacity: 2,
        ..GatewaySettings::default()
    };
    let (_, gateway) = gateway(
        ScriptedBackend::new().always("p", Reply::ok(json!("ok"))),
        settings,
    );
    for _ in 0..5 {
        gateway.execute(&request(), &provider("p")).await;
    }
    assert_eq!(gateway.learning_log().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_never_exceeds_limit() {
    let settings = GatewaySettings {
        max_concurrency: 2,
        ..GatewaySettings::default()
    };
    let (backend, gateway) = gateway(
        ScriptedBackend::new()
            .always("p", Reply::ok(json!("ok")))
            .delay("p", Duration::from_millis(100)),
        settings,
    );
    let p = provider("p");
    let requests: Vec<SkillRequest> = (0..6).map(|_| request()).collect();

    let outcomes = join_all(requests.iter().map(|r| gateway.execute(r, &p))).await;

    assert!(outcomes.iter().all(|o| o.success));
    assert_eq!(backend.peak_concurrency(), 2);
    assert_eq!(gateway.available_permits(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_same_request_never_runs_concurrently() {
    let (backend, gateway) = gateway(
        ScriptedBackend::new()
            .always("p", Reply::ok(json!("ok")))
            .delay("p", Duration::from_millis(100)),
        GatewaySettings::default(),
    );
    let p = provider("p");
    let shared = request();

    let (a, b) = tokio::join!(gateway.execute(&shared, &p), gateway.execute(&shared, &p));

    assert!(a.success && b.success);
    assert_eq!(backend.calls_for("p"), 2);
    assert_eq!(backend.peak_concurrency(), 1);
    assert_eq!(gateway.in_flight(), 0);
}

#[tokio::test]
async fn test_stats_count_per_provider_and_reset() {
    let (_, gateway) = gateway(
        ScriptedBackend::new()
            .always("good", Reply::ok(json!("ok")))
            .always("bad", Reply::error(FailureKind::Other, "boom")),
        GatewaySettings::default(),
    );
    gateway
        .execute(&request(), &provider("good").with_cost_per_call(0.5))
        .await;
    gateway
        .execute(&request(), &provider("good").with_cost_per_call(0.5))
        .await;
    gateway.execute(&request(), &provider("bad")).await;

    let stats = gateway.stats();
    assert_eq!(stats["good"].successes, 2);
    assert!((stats["good"].total_cost - 1.0).abs() < 1e-9);
    assert_eq!(stats["bad"].failures, 1);
    assert!((stats["good"].success_rate() - 1.0).abs() < f64::EPSILON);

    gateway.reset_stats();
    assert!(gateway.stats().is_empty());
    assert!(gateway.learning_log().is_empty());
}
