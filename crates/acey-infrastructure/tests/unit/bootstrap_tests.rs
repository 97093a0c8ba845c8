//! System bootstrap tests over echo backends

use acey_application::{JobSpec, SchedulerState};
use acey_domain::events::DomainEvent;
use acey_domain::error::Error;
use acey_domain::value_objects::{
    DispatchFailureKind, Provider, ProviderKind, SkillRequest, TrustContext, TrustLevel,
};
use acey_infrastructure::config::{AppConfig, ProviderConfig};
use acey_infrastructure::init_app;
use acey_providers::{BackendConfig, BackendType, EchoBackend};
use futures::StreamExt;
use serde_json::json;
use std::sync::Arc;

fn echo_provider(name: &str, kind: ProviderKind, priority: i32) -> ProviderConfig {
    let mut provider = ProviderConfig::new(name, kind);
    provider.priority = priority;
    provider.capabilities = vec!["all".to_string()];
    provider
}

fn config_with(providers: Vec<ProviderConfig>, jobs: Vec<JobSpec>) -> AppConfig {
    let mut config = AppConfig::default();
    config.providers = providers;
    config.scheduler.jobs = jobs;
    config.scheduler.health_check_interval_ms = 0;
    config
}

#[tokio::test]
async fn test_registers_configured_providers() {
    let config = config_with(
        vec![
            echo_provider("local-echo", ProviderKind::Local, 1),
            echo_provider("remote-echo", ProviderKind::Remote, 2),
        ],
        Vec::new(),
    );

    let context = init_app(config).await.unwrap();

    let status = context.control().get_status();
    assert_eq!(status.providers.len(), 2);
    assert_eq!(status.available_providers, 2);
    assert_eq!(status.scheduler.state, SchedulerState::Stopped);
    assert_eq!(context.backends().provider_names(), vec!["local-echo", "remote-echo"]);
}

#[tokio::test]
async fn test_submit_request_reaches_local_echo() {
    let config = config_with(
        vec![
            echo_provider("remote-echo", ProviderKind::Remote, 0),
            echo_provider("local-echo", ProviderKind::Local, 5),
        ],
        Vec::new(),
    );
    let context = init_app(config).await.unwrap();

    let outcome = context
        .control()
        .submit_request(SkillRequest::new("summarize", json!({"text": "hi"})))
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.provider_name, "local-echo");
    assert_eq!(outcome.output.unwrap()["echo"], json!({"text": "hi"}));
}

#[tokio::test]
async fn test_runtime_provider_is_routed_and_served() {
    let context = init_app(config_with(Vec::new(), Vec::new())).await.unwrap();

    context
        .add_provider(
            Provider::local("late-echo").with_capabilities(["all"]),
            Arc::new(EchoBackend::new()),
        )
        .await
        .unwrap();
    assert!(context.backends().contains("late-echo"));

    let outcome = context
        .control()
        .submit_request(SkillRequest::new("summarize", json!("late")))
        .await
        .unwrap();
    assert_eq!(outcome.provider_name, "late-echo");
    assert!(outcome.recovered_by.is_none());

    assert!(context.remove_provider("late-echo").await.is_some());
    assert!(!context.backends().contains("late-echo"));
    assert!(context.control().get_status().providers.is_empty());
}

#[tokio::test]
async fn test_duplicate_runtime_provider_keeps_existing_route() {
    let context = init_app(config_with(
        vec![echo_provider("local-echo", ProviderKind::Local, 0)],
        Vec::new(),
    ))
    .await
    .unwrap();

    let err = context
        .add_provider(
            Provider::remote("local-echo").with_capabilities(["all"]),
            Arc::new(EchoBackend::new()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DuplicateProvider { .. }));
    assert!(context.backends().contains("local-echo"));
    assert_eq!(context.control().get_status().providers.len(), 1);
}

#[tokio::test]
async fn test_denied_request_never_executes() {
    let context = init_app(config_with(
        vec![echo_provider("local-echo", ProviderKind::Local, 0)],
        Vec::new(),
    ))
    .await
    .unwrap();

    let request = SkillRequest::new("summarize", json!("x"))
        .with_trust(TrustContext::denied(TrustLevel::Untrusted));
    let failure = context.control().submit_request(request).await.unwrap_err();

    assert_eq!(failure.kind, DispatchFailureKind::ConstitutionalDenial);
    assert!(context.control().get_execution_stats().providers.is_empty());
}

#[tokio::test]
async fn test_scheduler_runs_configured_jobs() {
    let config = config_with(
        vec![echo_provider("local-echo", ProviderKind::Local, 0)],
        vec![
            JobSpec::new("summarize", json!({"text": "a"})),
            JobSpec::new("translate", json!("b")),
        ],
    );
    let context = init_app(config).await.unwrap();

    let record = context.control().scheduler().run_cycle_now().await;

    assert!(record.success);
    assert_eq!(record.executed, 2);
    assert_eq!(record.succeeded, 2);
    let stats = context.control().get_execution_stats();
    assert_eq!(stats.providers["local-echo"].successes, 2);
}

#[tokio::test]
async fn test_start_publishes_on_shared_bus() {
    let context = init_app(config_with(
        vec![echo_provider("local-echo", ProviderKind::Local, 0)],
        vec![JobSpec::new("summarize", json!("a"))],
    ))
    .await
    .unwrap();
    let mut events = context.control().subscribe_events().await.unwrap();

    context.control().start().await.unwrap();
    context.control().stop().await.unwrap();

    let mut names = Vec::new();
    while let Ok(Some(event)) =
        tokio::time::timeout(std::time::Duration::from_millis(100), events.next()).await
    {
        names.push(event.name());
        if matches!(event, DomainEvent::SchedulerStopped { .. }) {
            break;
        }
    }
    assert_eq!(names.first(), Some(&"scheduler_started"));
    assert!(names.contains(&"cycle_completed"));
    assert_eq!(names.last(), Some(&"scheduler_stopped"));
}

#[tokio::test]
async fn test_invalid_backend_aborts_bootstrap() {
    let mut provider = echo_provider("cloud", ProviderKind::Remote, 0);
    provider.backend = BackendConfig {
        backend_type: BackendType::OpenAi,
        api_key_env: Some("ACEY_BOOTSTRAP_TEST_KEY_NEVER_SET".to_string()),
        ..BackendConfig::default()
    };

    let result = init_app(config_with(vec![provider], Vec::new())).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_zero_interval_is_rejected() {
    let mut config = config_with(Vec::new(), Vec::new());
    config.scheduler.interval_ms = 0;

    assert!(init_app(config).await.is_err());
}
