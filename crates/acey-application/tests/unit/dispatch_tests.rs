//! Dispatch service tests

use crate::test_utils::{DispatchHarness, Reply, ScriptedBackend, fast_recovery};
use acey_application::GatewaySettings;
use acey_domain::Error;
use acey_domain::events::{DomainEvent, ProviderChange};
use acey_domain::value_objects::{
    DispatchFailureKind, FailureKind, Provider, SkillRequest, TrustContext, TrustLevel,
};
use acey_application::RecoverySettings;
use serde_json::json;

fn remote(name: &str) -> Provider {
    Provider::remote(name).with_capabilities(["all"])
}

#[tokio::test]
async fn test_denied_request_never_reaches_backend() {
    let harness = DispatchHarness::new(ScriptedBackend::new().always("A", Reply::ok(json!("x"))));
    harness.dispatch.register_provider(remote("A")).await.unwrap();

    let request = SkillRequest::new("chat", json!("hi"))
        .with_trust(TrustContext::denied(TrustLevel::Untrusted));
    let failure = harness.dispatch.submit_request(request).await.unwrap_err();

    assert_eq!(failure.kind, DispatchFailureKind::ConstitutionalDenial);
    assert!(failure.attempts.is_empty());
    assert!(harness.backend.calls().is_empty());
}

#[tokio::test]
async fn test_no_eligible_provider_is_selection_failure() {
    let harness = DispatchHarness::new(ScriptedBackend::new());
    harness
        .dispatch
        .register_provider(Provider::remote("text").with_capabilities(["text_generation"]))
        .await
        .unwrap();

    let failure = harness
        .dispatch
        .submit_request(SkillRequest::new("audio_transcription", json!("...")))
        .await
        .unwrap_err();

    assert_eq!(failure.kind, DispatchFailureKind::SelectionFailure);
    assert!(failure.outcome.is_none());
    assert_eq!(harness.recovery.stats().failures_handled, 0);
}

#[tokio::test]
async fn test_disabled_recovery_surfaces_execution_failure() {
    let settings = RecoverySettings {
        enabled: false,
        ..fast_recovery()
    };
    let harness = DispatchHarness::with_settings(
        ScriptedBackend::new().always("A", Reply::error(FailureKind::RateLimit, "slow down")),
        settings,
        GatewaySettings::default(),
    );
    harness.dispatch.register_provider(remote("A")).await.unwrap();

    let failure = harness
        .dispatch
        .submit_request(SkillRequest::new("chat", json!("hi")))
        .await
        .unwrap_err();

    assert_eq!(failure.kind, DispatchFailureKind::ExecutionFailure);
    assert_eq!(
        failure.outcome.as_ref().and_then(|o| o.failure_kind),
        Some(FailureKind::RateLimit)
    );
    assert_eq!(harness.backend.calls_for("A"), 1);
}

#[tokio::test]
async fn test_success_is_cached_and_counted() {
    let harness = DispatchHarness::new(ScriptedBackend::new().always("A", Reply::ok(json!("x"))));
    harness
        .dispatch
        .register_provider(remote("A").with_cost_per_call(0.25))
        .await
        .unwrap();

    let request = SkillRequest::new("chat", json!({"action": "greet"}));
    let outcome = harness.dispatch.submit_request(request.clone()).await.unwrap();

    assert!(outcome.success);
    assert!(outcome.recovered_by.is_none());
    assert!(harness.cache.contains(&request));

    let stats = harness.dispatch.execution_stats();
    assert_eq!(stats.providers["A"].successes, 1);
    assert!((stats.providers["A"].total_cost - 0.25).abs() < 1e-9);
    assert_eq!(stats.learning_log_len, 1);

    harness.dispatch.reset_stats();
    assert!(harness.dispatch.execution_stats().providers.is_empty());
}

#[tokio::test]
async fn test_provider_changes_are_announced() {
    let harness = DispatchHarness::new(ScriptedBackend::new());
    harness.dispatch.register_provider(remote("A")).await.unwrap();

    assert!(
        harness
            .dispatch
            .set_provider_availability("A", false)
            .await
            .unwrap()
    );
    // unchanged flag publishes nothing
    assert!(
        !harness
            .dispatch
            .set_provider_availability("A", false)
            .await
            .unwrap()
    );
    assert!(harness.dispatch.remove_provider("A").await.is_some());
    assert!(harness.dispatch.remove_provider("A").await.is_none());

    let changes: Vec<ProviderChange> = harness
        .events
        .events()
        .into_iter()
        .filter_map(|e| match e {
            DomainEvent::ProviderChanged { change, .. } => Some(change),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            ProviderChange::Registered,
            ProviderChange::AvailabilityChanged { available: false },
            ProviderChange::Removed,
        ]
    );
}

#[tokio::test]
async fn test_duplicate_registration_is_not_announced() {
    let harness = DispatchHarness::new(ScriptedBackend::new());
    harness.dispatch.register_provider(remote("A")).await.unwrap();

    let err = harness
        .dispatch
        .register_provider(remote("A"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateProvider { .. }));
    assert_eq!(harness.events.count("provider_changed"), 1);
}
