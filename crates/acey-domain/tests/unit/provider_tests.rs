//! Provider descriptor tests

use acey_domain::value_objects::{Provider, ProviderKind, required_capabilities};

#[test]
fn test_all_wildcard_supports_everything() {
    let provider = Provider::local("box").with_capabilities(["all"]);
    assert!(provider.supports(&required_capabilities("code_security_audio")));
}

#[test]
fn test_supports_requires_every_capability() {
    let provider = Provider::remote("api").with_capabilities(["text_generation"]);
    assert!(provider.supports(&required_capabilities("chat")));
    assert!(!provider.supports(&required_capabilities("code_review")));
}

#[test]
fn test_input_budget() {
    let bounded = Provider::remote("api").with_max_input_units(100);
    assert!(bounded.accepts_input(100));
    assert!(!bounded.accepts_input(101));
    assert!(Provider::remote("open").accepts_input(u64::MAX));
}

#[test]
fn test_kind_deserializes_lowercase() {
    let provider: Provider = serde_json::from_str(
        r#"{"name":"x","kind":"local","available":true,"priority":0,
            "capabilities":[],"cost_per_call":null,"max_input_units":null,
            "max_output_units":null,"timeout_ms":null}"#,
    )
    .unwrap();
    assert_eq!(provider.kind, ProviderKind::Local);
    assert!(provider.is_local());
}
