//! Emergency mode flag
//!
//! Shared by the recovery chain (which may request emergency mode on a
//! critical failure) and the scheduler (which enters it after repeated cycle
//! failures and pauses while it is active). Only an explicit
//! [`EmergencyState::deactivate`] clears it.

use acey_domain::events::DomainEvent;
use acey_domain::ports::SharedEventBus;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{error, info, warn};

#[derive(Debug, Default, Clone)]
struct Activation {
    reason: String,
    since: Option<DateTime<Utc>>,
}

/// Sticky, process-wide emergency flag
pub struct EmergencyState {
    active: AtomicBool,
    activation: Mutex<Activation>,
    events: SharedEventBus,
}

impl EmergencyState {
    /// Create an inactive state publishing changes to `events`
    pub fn new(events: SharedEventBus) -> Self {
        Self {
            active: AtomicBool::new(false),
            activation: Mutex::new(Activation::default()),
            events,
        }
    }

    /// Whether emergency mode is on
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Reason given when emergency mode was entered
    pub fn reason(&self) -> Option<String> {
        if !self.is_active() {
            return None;
        }
        Some(self.lock().reason.clone())
    }

    /// When emergency mode was entered
    pub fn since(&self) -> Option<DateTime<Utc>> {
        if !self.is_active() {
            return None;
        }
        self.lock().since
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Activation> {
        self.activation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enter emergency mode; returns `false` when it was already on
    pub async fn activate(&self, reason: impl Into<String>) -> bool {
        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }
        let reason = reason.into();
        {
            let mut activation = self.lock();
            activation.reason.clone_from(&reason);
            activation.since = Some(Utc::now());
        }
        error!(reason = %reason, "Emergency mode activated");
        self.publish(true, reason).await;
        true
    }

    /// Leave emergency mode; returns `false` when it was already off
    pub async fn deactivate(&self, reason: impl Into<String>) -> bool {
        if self
            .active
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }
        *self.lock() = Activation::default();
        let reason = reason.into();
        info!(reason = %reason, "Emergency mode cleared");
        self.publish(false, reason).await;
        true
    }

    async fn publish(&self, active: bool, reason: String) {
        let event = DomainEvent::EmergencyModeChanged { active, reason };
        if let Err(e) = self.events.publish_event(event).await {
            warn!(error = %e, "Failed to publish emergency mode change");
        }
    }
}
