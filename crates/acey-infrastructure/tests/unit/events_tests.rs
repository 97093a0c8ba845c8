//! Event bus tests

use acey_domain::events::DomainEvent;
use acey_domain::ports::EventBusProvider;
use acey_infrastructure::config::EventBusConfig;
use acey_infrastructure::events::{
    NullEventBusProvider, TokioBroadcastEventBus, create_event_bus,
};
use futures::StreamExt;

#[tokio::test]
async fn test_broadcast_delivers_to_every_subscriber() {
    let bus = TokioBroadcastEventBus::with_capacity(16);
    let mut first = bus.subscribe_events().await.unwrap();
    let mut second = bus.subscribe_events().await.unwrap();
    assert!(bus.has_subscribers());
    assert_eq!(bus.subscriber_count(), 2);

    bus.publish_event(DomainEvent::SchedulerPaused).await.unwrap();
    bus.publish_event(DomainEvent::SchedulerResumed).await.unwrap();

    assert_eq!(first.next().await, Some(DomainEvent::SchedulerPaused));
    assert_eq!(first.next().await, Some(DomainEvent::SchedulerResumed));
    assert_eq!(second.next().await, Some(DomainEvent::SchedulerPaused));
}

#[tokio::test]
async fn test_publish_without_subscribers_is_ok() {
    let bus = TokioBroadcastEventBus::new();
    assert!(!bus.has_subscribers());
    assert!(bus.publish_event(DomainEvent::SchedulerPaused).await.is_ok());
}

#[tokio::test]
async fn test_lagging_subscriber_skips_ahead() {
    let bus = TokioBroadcastEventBus::with_capacity(2);
    let mut events = bus.subscribe_events().await.unwrap();

    for current_cycle in 1..=5 {
        bus.publish_event(DomainEvent::SchedulerStopped { current_cycle })
            .await
            .unwrap();
    }

    // Only the newest `capacity` events survive
    assert_eq!(
        events.next().await,
        Some(DomainEvent::SchedulerStopped { current_cycle: 4 })
    );
    assert_eq!(
        events.next().await,
        Some(DomainEvent::SchedulerStopped { current_cycle: 5 })
    );
}

#[tokio::test]
async fn test_null_bus_discards_everything() {
    let bus = NullEventBusProvider::new();
    bus.publish_event(DomainEvent::SchedulerPaused).await.unwrap();

    let mut events = bus.subscribe_events().await.unwrap();
    assert!(!bus.has_subscribers());
    assert_eq!(events.next().await, None);
}

#[test]
fn test_factory_honors_config() {
    let null = create_event_bus(&EventBusConfig::null());
    assert!(!null.has_subscribers());

    let tokio_bus = TokioBroadcastEventBus::with_capacity(0);
    assert_eq!(tokio_bus.capacity(), 1);
}
