//! Backend factory and configuration tests

use acey_domain::error::Error;
use acey_providers::{BackendConfig, BackendType, create_backend};

#[test]
fn test_default_config_is_echo() {
    let config = BackendConfig::default();
    assert_eq!(config.backend_type, BackendType::Echo);

    let backend = create_backend(&config).unwrap();
    assert_eq!(backend.backend_name(), "echo");
}

#[test]
fn test_ollama_backend_from_config() {
    let config = BackendConfig::ollama("llama3.2").with_base_url("http://127.0.0.1:11434");
    let backend = create_backend(&config).unwrap();
    assert_eq!(backend.backend_name(), "ollama");
}

#[test]
fn test_openai_backend_requires_key_variable() {
    let config = BackendConfig::openai("gpt-4o-mini", "ACEY_TEST_KEY_THAT_IS_NEVER_SET");
    let result = create_backend(&config);
    assert!(matches!(result, Err(Error::Configuration { .. })));
}

#[test]
fn test_backend_type_uses_lowercase_names() {
    let config: BackendConfig =
        serde_json::from_value(serde_json::json!({"type": "openai", "model": "m"})).unwrap();
    assert_eq!(config.backend_type, BackendType::OpenAi);
    assert_eq!(config.model.as_deref(), Some("m"));
    assert!(config.base_url.is_none());
}
