//! Event Bus Infrastructure
//!
//! In-process implementations of the [`EventBusProvider`] port.

use crate::config::{EventBusConfig, EventBusKind};
use crate::constants::EVENT_BUS_DEFAULT_CAPACITY;
use acey_domain::error::Result;
use acey_domain::events::DomainEvent;
use acey_domain::ports::{DomainEventStream, EventBusProvider, SharedEventBus};
use async_trait::async_trait;
use futures::stream;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Build the event bus selected by `config`
pub fn create_event_bus(config: &EventBusConfig) -> SharedEventBus {
    match config.provider {
        EventBusKind::Tokio => Arc::new(TokioBroadcastEventBus::with_capacity(config.capacity)),
        EventBusKind::Null => Arc::new(NullEventBusProvider::new()),
    }
}

// ============================================================================
// Null Event Bus (Testing)
// ============================================================================

/// Event bus discarding everything it is given
#[derive(Debug, Default)]
pub struct NullEventBusProvider;

impl NullEventBusProvider {
    /// Create a new null event bus provider
    pub fn new() -> Self {
        Self
    }

    /// Create as Arc for sharing
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl EventBusProvider for NullEventBusProvider {
    async fn publish_event(&self, _event: DomainEvent) -> Result<()> {
        Ok(())
    }

    async fn subscribe_events(&self) -> Result<DomainEventStream> {
        Ok(Box::pin(stream::empty()))
    }

    fn has_subscribers(&self) -> bool {
        false
    }
}

// ============================================================================
// Tokio Broadcast Event Bus (Production)
// ============================================================================

/// Event bus provider using tokio broadcast channels
///
/// Events go to every subscriber alive at publish time. Nothing is persisted;
/// a subscriber that falls more than `capacity` events behind skips ahead.
#[derive(Clone)]
pub struct TokioBroadcastEventBus {
    sender: Arc<broadcast::Sender<DomainEvent>>,
    capacity: usize,
}

impl TokioBroadcastEventBus {
    /// Create a bus with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(EVENT_BUS_DEFAULT_CAPACITY)
    }

    /// Create with custom capacity; zero is raised to one
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
            capacity,
        }
    }

    /// Create as Arc for sharing
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Current number of subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for TokioBroadcastEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokioBroadcastEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioBroadcastEventBus")
            .field("capacity", &self.capacity)
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

#[async_trait]
impl EventBusProvider for TokioBroadcastEventBus {
    async fn publish_event(&self, event: DomainEvent) -> Result<()> {
        let name = event.name();
        match self.sender.send(event) {
            Ok(count) => debug!(event = name, subscribers = count, "event published"),
            Err(_) => debug!(event = name, "event published without subscribers"),
        }
        Ok(())
    }

    async fn subscribe_events(&self) -> Result<DomainEventStream> {
        let receiver = self.sender.subscribe();
        let events = stream::unfold(receiver, |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => return Some((event, receiver)),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "event subscriber lagged, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        });
        Ok(Box::pin(events))
    }

    fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}
