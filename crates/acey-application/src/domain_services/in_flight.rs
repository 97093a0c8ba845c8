//! Per-request exclusivity
//!
//! Two executions of the same request id never overlap. A second caller waits
//! until the first one's [`InFlightGuard`] is dropped.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use tokio::sync::Notify;
use uuid::Uuid;

/// Set of request ids currently executing
#[derive(Debug, Default)]
pub struct InFlightRequests {
    active: Mutex<HashSet<Uuid>>,
    released: Notify,
}

impl InFlightRequests {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id`, waiting while another execution holds it
    pub async fn acquire(&self, id: Uuid) -> InFlightGuard<'_> {
        loop {
            // Register interest before checking so a release in between is not missed
            let released = self.released.notified();
            if self.try_insert(id) {
                return InFlightGuard { owner: self, id };
            }
            released.await;
        }
    }

    fn try_insert(&self, id: Uuid) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id)
    }

    fn release(&self, id: Uuid) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        self.released.notify_waiters();
    }

    /// Number of requests currently executing
    pub fn len(&self) -> usize {
        self.active.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing is executing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `id` is executing right now
    pub fn contains(&self, id: Uuid) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }
}

/// Releases its request id on drop
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlightRequests,
    id: Uuid,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.release(self.id);
    }
}
