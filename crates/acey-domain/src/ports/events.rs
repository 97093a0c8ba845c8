//! Event Bus Provider Port
//!
//! Defines the contract for event publish/subscribe services. Implementations
//! (`TokioBroadcastEventBus`, `NullEventBusProvider`) live in the
//! infrastructure layer.
//!
//! ## Usage
//!
//! ```no_run
//! use acey_domain::ports::EventBusProvider;
//! use acey_domain::events::DomainEvent;
//! use std::sync::Arc;
//!
//! async fn announce_pause(event_bus: Arc<dyn EventBusProvider>) -> acey_domain::Result<()> {
//!     event_bus.publish_event(DomainEvent::SchedulerPaused).await?;
//!     Ok(())
//! }
//! ```

use crate::error::Result;
use crate::events::DomainEvent;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed async stream of domain events
pub type DomainEventStream = Pin<Box<dyn Stream<Item = DomainEvent> + Send + Sync + 'static>>;

/// Event bus provider interface for typed event pub/sub
#[async_trait]
pub trait EventBusProvider: Send + Sync {
    /// Publish a typed domain event
    ///
    /// Publishing with no subscribers is not an error.
    async fn publish_event(&self, event: DomainEvent) -> Result<()>;

    /// Subscribe to receive typed domain events
    async fn subscribe_events(&self) -> Result<DomainEventStream>;

    /// Check if there are any active event subscribers
    fn has_subscribers(&self) -> bool;
}

/// Shared event bus handle
pub type SharedEventBus = Arc<dyn EventBusProvider>;
