//! Typed domain events
//!
//! Consumers (reporting, notifications) subscribe to these through the
//! [`EventBusProvider`](crate::ports::EventBusProvider) port. The core never
//! depends on anyone listening.

use crate::value_objects::{Alert, CycleRecord};
use serde::{Deserialize, Serialize};

/// Kind of change applied to a registered provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderChange {
    /// Provider added to the registry
    Registered,
    /// Provider removed from the registry
    Removed,
    /// Availability flag flipped
    AvailabilityChanged {
        /// New availability
        available: bool,
    },
}

/// System-wide events emitted by the dispatch core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A scheduler cycle finished and was recorded
    CycleCompleted {
        /// The recorded cycle
        record: CycleRecord,
    },
    /// An alert was appended to the alert log
    Alert {
        /// The alert
        alert: Alert,
    },
    /// Emergency mode was entered or left
    EmergencyModeChanged {
        /// Whether emergency mode is now active
        active: bool,
        /// Why the mode changed
        reason: String,
    },
    /// The provider registry changed
    ProviderChanged {
        /// Provider name
        name: String,
        /// What changed
        change: ProviderChange,
    },
    /// Scheduler transitioned from stopped to running
    SchedulerStarted {
        /// Cycle interval
        interval_ms: u64,
        /// Last completed cycle number at start time
        current_cycle: u64,
    },
    /// Scheduler transitioned to stopped
    SchedulerStopped {
        /// Last completed cycle number
        current_cycle: u64,
    },
    /// Scheduler paused
    SchedulerPaused,
    /// Scheduler resumed
    SchedulerResumed,
}

impl DomainEvent {
    /// Stable event name, used as a log field and topic
    pub fn name(&self) -> &'static str {
        match self {
            Self::CycleCompleted { .. } => "cycle_completed",
            Self::Alert { .. } => "alert",
            Self::EmergencyModeChanged { .. } => "emergency_mode_changed",
            Self::ProviderChanged { .. } => "provider_changed",
            Self::SchedulerStarted { .. } => "scheduler_started",
            Self::SchedulerStopped { .. } => "scheduler_stopped",
            Self::SchedulerPaused => "scheduler_paused",
            Self::SchedulerResumed => "scheduler_resumed",
        }
    }
}
