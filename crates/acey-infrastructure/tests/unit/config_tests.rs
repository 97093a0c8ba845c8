//! Configuration loader tests
//!
//! Environment-dependent cases run inside `figment::Jail`, which serializes
//! access to the process environment and working directory.

use acey_domain::error::Error;
use acey_domain::value_objects::ProviderKind;
use acey_infrastructure::config::{AppConfig, ConfigLoader, EventBusKind, ProviderConfig};
use acey_infrastructure::constants::DEFAULT_LOG_LEVEL;
use acey_providers::BackendType;
use figment::Jail;
use tempfile::TempDir;

fn load_in_jail(loader: &ConfigLoader) -> figment::error::Result<AppConfig> {
    loader.load().map_err(|e| e.to_string().into())
}

#[test]
fn test_defaults_without_sources() {
    Jail::expect_with(|_jail| {
        let config = load_in_jail(&ConfigLoader::new())?;

        assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.scheduler.interval_ms, 300_000);
        assert_eq!(config.scheduler.max_consecutive_failures, 3);
        assert_eq!(config.dispatch.default_timeout_ms, 60_000);
        assert!((config.dispatch.quality_threshold - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.recovery.max_retries, 3);
        assert_eq!(config.recovery.base_backoff_ms, 1_000);
        assert_eq!(config.recovery.max_backoff_ms, 30_000);
        assert_eq!(config.event_bus.provider, EventBusKind::Tokio);
        assert!(config.providers.is_empty());
        Ok(())
    });
}

#[test]
fn test_toml_file_in_working_directory_is_found() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "acey.toml",
            r#"
            [scheduler]
            interval_ms = 60000

            [[scheduler.jobs]]
            skill_name = "summarize"
            payload = { text = "daily report" }

            [[providers]]
            name = "local-llama"
            kind = "local"
            priority = 1
            capabilities = ["text_generation"]

            [providers.backend]
            type = "ollama"
            model = "llama3.2"

            [[providers]]
            name = "cloud"
            kind = "remote"
            priority = 2
            capabilities = ["all"]
            cost_per_call = 0.02
            available = false
            "#,
        )?;

        let config = load_in_jail(&ConfigLoader::new())?;

        assert_eq!(config.scheduler.interval_ms, 60_000);
        assert_eq!(config.scheduler.jobs.len(), 1);
        assert_eq!(config.scheduler.jobs[0].skill_name, "summarize");
        assert!(config.scheduler.jobs[0].permitted);
        assert_eq!(config.providers.len(), 2);

        let local = &config.providers[0];
        assert_eq!(local.kind, ProviderKind::Local);
        assert_eq!(local.backend.backend_type, BackendType::Ollama);
        assert!(local.available);

        let cloud = &config.providers[1];
        assert_eq!(cloud.backend.backend_type, BackendType::Echo);
        assert_eq!(cloud.cost_per_call, Some(0.02));
        assert!(!cloud.available);
        Ok(())
    });
}

#[test]
fn test_env_overrides_file_with_double_underscore_nesting() {
    Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[scheduler]\ninterval_ms = 60000\n")?;
        jail.set_env("ACEY_SCHEDULER__INTERVAL_MS", "5000");
        jail.set_env("ACEY_DISPATCH__COST_OPTIMIZATION", "true");
        jail.set_env("ACEY_RECOVERY__MAX_RETRIES", "5");

        let config = load_in_jail(&ConfigLoader::new().with_config_path("custom.toml"))?;

        assert_eq!(config.scheduler.interval_ms, 5_000);
        assert!(config.dispatch.cost_optimization);
        assert_eq!(config.recovery.max_retries, 5);
        Ok(())
    });
}

#[test]
fn test_custom_env_prefix() {
    Jail::expect_with(|jail| {
        jail.set_env("ACEY_SCHEDULER__INTERVAL_MS", "1");
        jail.set_env("OTHER_SCHEDULER__INTERVAL_MS", "7000");

        let config = load_in_jail(&ConfigLoader::new().with_env_prefix("OTHER"))?;

        assert_eq!(config.scheduler.interval_ms, 7_000);
        Ok(())
    });
}

#[test]
fn test_missing_explicit_file_falls_back_to_defaults() {
    Jail::expect_with(|_jail| {
        let config = load_in_jail(&ConfigLoader::new().with_config_path("does-not-exist.toml"))?;
        assert_eq!(config, AppConfig::default());
        Ok(())
    });
}

#[test]
fn test_validation_rejects_bad_values() {
    let cases = [
        ("[scheduler]\ninterval_ms = 0\n", "interval_ms"),
        ("[scheduler]\nmax_consecutive_failures = 0\n", "max_consecutive_failures"),
        ("[scheduler]\nhistory_capacity = 0\n", "history_capacity"),
        ("[dispatch]\nmax_concurrency = 0\n", "max_concurrency"),
        ("[dispatch]\nquality_threshold = 1.5\n", "quality_threshold"),
        ("[logging]\nlevel = \"loud\"\n", "Invalid log level"),
        (
            "[[providers]]\nname = \"a\"\n[[providers]]\nname = \"a\"\n",
            "Duplicate provider name",
        ),
        (
            "[[providers]]\nname = \"a\"\ncost_per_call = -1.0\n",
            "cost_per_call",
        ),
    ];

    for (content, expected) in cases {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("acey.toml");
        std::fs::write(&path, content).unwrap();

        let result = ConfigLoader::new()
            .with_env_prefix("ACEY_VALIDATION_TEST")
            .with_config_path(&path)
            .load();

        match result {
            Err(err @ Error::Configuration { .. }) => {
                assert!(err.to_string().contains(expected), "{content}: {err}");
            }
            other => panic!("{content}: expected configuration error, got {other:?}"),
        }
    }
}

#[test]
fn test_save_then_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.toml");

    let mut config = AppConfig::default();
    config.scheduler.interval_ms = 42_000;
    let mut provider = ProviderConfig::new("echo", ProviderKind::Local);
    provider.capabilities = vec!["all".to_string()];
    provider.cost_per_call = Some(0.5);
    config.providers.push(provider);

    let loader = ConfigLoader::new().with_env_prefix("ACEY_SAVE_TEST");
    loader.save_to_file(&config, &path).unwrap();
    let loaded = loader.clone().with_config_path(&path).load().unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_provider_config_to_provider() {
    let mut config = ProviderConfig::new("cloud", ProviderKind::Remote);
    config.priority = 3;
    config.capabilities = vec!["analysis".to_string(), "text_generation".to_string()];
    config.timeout_ms = Some(2_000);

    let provider = config.to_provider();

    assert_eq!(provider.name, "cloud");
    assert_eq!(provider.priority, 3);
    assert!(provider.capabilities.contains("analysis"));
    assert_eq!(provider.timeout_ms, Some(2_000));
    assert!(provider.available);
}
