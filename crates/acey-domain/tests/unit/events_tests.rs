//! Domain event tests

use acey_domain::events::{DomainEvent, ProviderChange};
use serde_json::json;

#[test]
fn test_events_are_tagged_by_type() {
    let event = DomainEvent::ProviderChanged {
        name: "gpt".to_string(),
        change: ProviderChange::AvailabilityChanged { available: false },
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["type"], json!("provider_changed"));
    assert_eq!(value["name"], json!("gpt"));
    assert_eq!(event.name(), "provider_changed");
}

#[test]
fn test_unit_events_round_trip() {
    let value = serde_json::to_value(DomainEvent::SchedulerPaused).unwrap();
    assert_eq!(value, json!({"type": "scheduler_paused"}));
    let back: DomainEvent = serde_json::from_value(value).unwrap();
    assert_eq!(back, DomainEvent::SchedulerPaused);
}
