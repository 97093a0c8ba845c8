//! Failure recovery
//!
//! A [`RecoveryChain`] holds [`RecoveryStrategy`] implementations ordered by
//! priority. For a failed outcome it tries every matching strategy in order
//! and stops at the first success; when none succeeds it reports an
//! `exhausted` attempt. All attempts are kept in a bounded history.

mod chain;
mod strategies;

pub use chain::{RecoveryChain, RecoveryReport, RecoveryStats, StrategyStats};
pub use strategies::{
    EmergencyEscalation, FallbackProvider, RetryWithBackoff, SimplifyInput, UseCache,
    backoff_delay, simplify_payload,
};

use acey_domain::constants::{
    OUTCOME_CACHE_CAPACITY, OUTCOME_CACHE_RETENTION_SECS, RECOVERY_BASE_BACKOFF_MS,
    RECOVERY_HISTORY_CAPACITY, RECOVERY_MAX_BACKOFF_MS, RECOVERY_MAX_FALLBACKS,
    RECOVERY_MAX_RETRIES,
};
use acey_domain::value_objects::{Outcome, Provider, RecoveryAttempt, SkillRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Recovery behavior knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoverySettings {
    /// Run the chain on execution failures at all
    pub enabled: bool,
    /// Retries allowed per request
    pub max_retries: u32,
    /// First retry delay; doubles per attempt
    pub base_backoff_ms: u64,
    /// Upper bound on the retry delay
    pub max_backoff_ms: u64,
    /// Allow re-routing to another provider
    pub fallback_enabled: bool,
    /// Alternative providers tried per failure
    pub max_fallbacks: usize,
    /// Outcome cache time-to-live
    pub cache_retention_secs: u64,
    /// Outcome cache size bound
    pub cache_capacity: u64,
    /// Attempts kept in the recovery history
    pub history_capacity: usize,
}

impl Default for RecoverySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: RECOVERY_MAX_RETRIES,
            base_backoff_ms: RECOVERY_BASE_BACKOFF_MS,
            max_backoff_ms: RECOVERY_MAX_BACKOFF_MS,
            fallback_enabled: true,
            max_fallbacks: RECOVERY_MAX_FALLBACKS,
            cache_retention_secs: OUTCOME_CACHE_RETENTION_SECS,
            cache_capacity: OUTCOME_CACHE_CAPACITY,
            history_capacity: RECOVERY_HISTORY_CAPACITY,
        }
    }
}

/// What a strategy knows about the failure it is asked to handle
#[derive(Debug, Clone)]
pub struct RecoveryContext {
    /// The request that failed
    pub request: SkillRequest,
    /// The provider it failed on
    pub provider: Provider,
    /// Retries already spent on this request
    pub previous_attempts: u32,
}

impl RecoveryContext {
    /// Context for a first failure
    pub fn new(request: SkillRequest, provider: Provider) -> Self {
        Self {
            request,
            provider,
            previous_attempts: 0,
        }
    }

    /// Set the retries already spent
    pub fn with_previous_attempts(mut self, previous_attempts: u32) -> Self {
        self.previous_attempts = previous_attempts;
        self
    }
}

/// One way of recovering from a failed execution
#[async_trait]
pub trait RecoveryStrategy: Send + Sync {
    /// Stable strategy name, reported in attempts
    fn name(&self) -> &'static str;

    /// Lower runs first
    fn priority(&self) -> u32;

    /// Whether this strategy applies to `failure`
    fn matches(&self, failure: &Outcome, context: &RecoveryContext) -> bool;

    /// Try to recover
    async fn apply(&self, failure: &Outcome, context: &RecoveryContext) -> RecoveryAttempt;
}
