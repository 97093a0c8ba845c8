//! Cache of recent successful outcomes, keyed by `skill::action`

use acey_domain::value_objects::{Outcome, SkillRequest};
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

/// TTL-bounded store of successful outcomes
#[derive(Clone)]
pub struct OutcomeCache {
    entries: Cache<String, Outcome>,
}

impl OutcomeCache {
    /// Create a cache holding at most `capacity` entries for `retention`
    pub fn new(capacity: u64, retention: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(retention)
                .build(),
        }
    }

    /// Remember a successful, freshly executed outcome for `request`
    ///
    /// Failures and outcomes that were themselves served from cache are
    /// ignored.
    pub async fn store(&self, request: &SkillRequest, outcome: &Outcome) {
        if !outcome.success || outcome.from_cache {
            return;
        }
        let key = request.cache_key();
        debug!(key = %key, provider = %outcome.provider_name, "Caching outcome");
        self.entries.insert(key, outcome.clone()).await;
    }

    /// Whether an unexpired entry exists for `request`
    pub fn contains(&self, request: &SkillRequest) -> bool {
        self.entries.contains_key(&request.cache_key())
    }

    /// Cached outcome for `request`, re-addressed to its id
    pub async fn lookup(&self, request: &SkillRequest) -> Option<Outcome> {
        let mut outcome = self.entries.get(&request.cache_key()).await?;
        outcome.request_id = request.id;
        outcome.from_cache = true;
        Some(outcome)
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Approximate number of entries
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}
