//! EventBus configuration types

use crate::constants::EVENT_BUS_DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};

/// EventBus implementation selector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventBusKind {
    /// In-process broadcast channel
    #[default]
    Tokio,
    /// Discards every event
    Null,
}

/// EventBus configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventBusConfig {
    /// Implementation to use
    pub provider: EventBusKind,

    /// Events buffered per subscriber before the oldest are dropped
    pub capacity: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            provider: EventBusKind::Tokio,
            capacity: EVENT_BUS_DEFAULT_CAPACITY,
        }
    }
}

impl EventBusConfig {
    /// Null bus, for tests
    pub fn null() -> Self {
        Self {
            provider: EventBusKind::Null,
            ..Self::default()
        }
    }
}
