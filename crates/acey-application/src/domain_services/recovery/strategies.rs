//! Built-in recovery strategies
//!
//! | priority | strategy               | applies to                               |
//! |----------|------------------------|------------------------------------------|
//! | 1        | `retry-with-backoff`   | any failure, retries left                 |
//! | 2        | `fallback-provider`    | transient failures, fallback enabled      |
//! | 3        | `simplify-input`       | complexity failures                       |
//! | 4        | `use-cache`            | any failure with a cached outcome         |
//! | 5        | `emergency-escalation` | critical failures                         |

use super::{RecoveryContext, RecoveryStrategy};
use crate::domain_services::emergency::EmergencyState;
use crate::domain_services::gateway::ExecutionGateway;
use crate::domain_services::outcome_cache::OutcomeCache;
use crate::domain_services::selector::ProviderSelector;
use acey_domain::constants::{SIMPLIFY_MAX_ENTRIES, SIMPLIFY_MAX_STRING_CHARS};
use acey_domain::value_objects::{Outcome, RecoveryAttempt};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Delay before retry number `attempt` (zero-based): `min(base * 2^attempt, max)`
pub fn backoff_delay(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    let factor = 1_u64.checked_shl(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(base_ms.saturating_mul(factor).min(max_ms))
}

/// Shrink a payload: long strings are cut, objects and arrays keep their
/// first few entries, everything else is left alone
///
/// Objects are `serde_json` maps sorted by key, so "first" means the
/// alphabetically smallest keys, not insertion order.
pub fn simplify_payload(payload: &Value) -> Value {
    match payload {
        Value::String(s) => Value::String(s.chars().take(SIMPLIFY_MAX_STRING_CHARS).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .take(SIMPLIFY_MAX_ENTRIES)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.iter().take(SIMPLIFY_MAX_ENTRIES).cloned().collect())
        }
        other => other.clone(),
    }
}

// ---------------------------------------------------------------------------

/// Re-run the request on the same provider with exponential backoff
pub struct RetryWithBackoff {
    gateway: Arc<ExecutionGateway>,
    max_retries: u32,
    base_backoff_ms: u64,
    max_backoff_ms: u64,
}

impl RetryWithBackoff {
    /// Strategy name
    pub const NAME: &'static str = "retry-with-backoff";

    /// Create the strategy
    pub fn new(
        gateway: Arc<ExecutionGateway>,
        max_retries: u32,
        base_backoff_ms: u64,
        max_backoff_ms: u64,
    ) -> Self {
        Self {
            gateway,
            max_retries,
            base_backoff_ms,
            max_backoff_ms,
        }
    }
}

#[async_trait]
impl RecoveryStrategy for RetryWithBackoff {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> u32 {
        1
    }

    fn matches(&self, _failure: &Outcome, context: &RecoveryContext) -> bool {
        context.previous_attempts < self.max_retries
    }

    async fn apply(&self, failure: &Outcome, context: &RecoveryContext) -> RecoveryAttempt {
        let started = Instant::now();
        let mut last_error = failure.message().to_string();
        let mut used = 0;

        for attempt in context.previous_attempts..self.max_retries {
            let delay = backoff_delay(attempt, self.base_backoff_ms, self.max_backoff_ms);
            debug!(attempt = attempt + 1, delay = ?delay, "Retrying after backoff");
            tokio::time::sleep(delay).await;

            let outcome = self
                .gateway
                .execute(&context.request, &context.provider)
                .await;
            used += 1;
            if outcome.success {
                let payload = outcome.output.clone();
                return RecoveryAttempt::succeeded(Self::NAME, payload, used, elapsed_ms(started))
                    .with_outcome(outcome);
            }
            last_error = outcome.message().to_string();
        }

        RecoveryAttempt::failed(
            Self::NAME,
            format!("retries exhausted after {used} attempt(s): {last_error}"),
            used,
            elapsed_ms(started),
        )
        .with_provider(&context.provider.name)
    }
}

// ---------------------------------------------------------------------------

/// Re-route the request to the next best provider
pub struct FallbackProvider {
    gateway: Arc<ExecutionGateway>,
    selector: Arc<ProviderSelector>,
    enabled: bool,
    max_fallbacks: usize,
}

impl FallbackProvider {
    /// Strategy name
    pub const NAME: &'static str = "fallback-provider";

    /// Create the strategy
    pub fn new(
        gateway: Arc<ExecutionGateway>,
        selector: Arc<ProviderSelector>,
        enabled: bool,
        max_fallbacks: usize,
    ) -> Self {
        Self {
            gateway,
            selector,
            enabled,
            max_fallbacks,
        }
    }
}

#[async_trait]
impl RecoveryStrategy for FallbackProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> u32 {
        2
    }

    fn matches(&self, failure: &Outcome, _context: &RecoveryContext) -> bool {
        self.enabled && self.max_fallbacks > 0 && failure.is_transient_failure()
    }

    async fn apply(&self, _failure: &Outcome, context: &RecoveryContext) -> RecoveryAttempt {
        let started = Instant::now();
        let mut excluded = BTreeSet::from([context.provider.name.clone()]);
        let mut used = 0;
        let mut last_error = None;

        for _ in 0..self.max_fallbacks {
            let Some(alternative) = self.selector.select_excluding(&context.request, &excluded)
            else {
                break;
            };
            debug!(provider = %alternative.name, "Falling back to alternative provider");
            let outcome = self.gateway.execute(&context.request, &alternative).await;
            used += 1;
            if outcome.success {
                let payload = outcome.output.clone();
                return RecoveryAttempt::succeeded(Self::NAME, payload, used, elapsed_ms(started))
                    .with_outcome(outcome);
            }
            last_error = Some(format!("{}: {}", alternative.name, outcome.message()));
            excluded.insert(alternative.name);
        }

        let message = last_error.map_or_else(
            || "no alternative provider available".to_string(),
            |e| format!("all fallback providers failed, last: {e}"),
        );
        RecoveryAttempt::failed(Self::NAME, message, used, elapsed_ms(started))
    }
}

// ---------------------------------------------------------------------------

/// Shrink the payload and re-run on the same provider
pub struct SimplifyInput {
    gateway: Arc<ExecutionGateway>,
}

impl SimplifyInput {
    /// Strategy name
    pub const NAME: &'static str = "simplify-input";

    /// Create the strategy
    pub fn new(gateway: Arc<ExecutionGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl RecoveryStrategy for SimplifyInput {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> u32 {
        3
    }

    fn matches(&self, failure: &Outcome, _context: &RecoveryContext) -> bool {
        failure.is_complexity_failure()
    }

    async fn apply(&self, _failure: &Outcome, context: &RecoveryContext) -> RecoveryAttempt {
        let started = Instant::now();
        let simplified = simplify_payload(&context.request.payload);
        if simplified == context.request.payload {
            return RecoveryAttempt::failed(
                Self::NAME,
                "payload cannot be simplified further",
                0,
                elapsed_ms(started),
            );
        }

        let request = context.request.with_payload(simplified);
        let outcome = self.gateway.execute(&request, &context.provider).await;
        if outcome.success {
            let payload = outcome.output.clone();
            return RecoveryAttempt::succeeded(Self::NAME, payload, 1, elapsed_ms(started))
                .with_outcome(outcome);
        }
        RecoveryAttempt::failed(
            Self::NAME,
            format!("simplified request failed: {}", outcome.message()),
            1,
            elapsed_ms(started),
        )
        .with_provider(&context.provider.name)
    }
}

// ---------------------------------------------------------------------------

/// Serve a recent successful outcome for the same skill and action
pub struct UseCache {
    cache: OutcomeCache,
}

impl UseCache {
    /// Strategy name
    pub const NAME: &'static str = "use-cache";

    /// Create the strategy
    pub fn new(cache: OutcomeCache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl RecoveryStrategy for UseCache {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> u32 {
        4
    }

    fn matches(&self, _failure: &Outcome, context: &RecoveryContext) -> bool {
        self.cache.contains(&context.request)
    }

    async fn apply(&self, _failure: &Outcome, context: &RecoveryContext) -> RecoveryAttempt {
        let started = Instant::now();
        match self.cache.lookup(&context.request).await {
            Some(cached) => {
                let payload = cached.output.clone();
                RecoveryAttempt::succeeded(Self::NAME, payload, 0, elapsed_ms(started))
                    .with_outcome(cached)
                    .from_cache()
            }
            None => RecoveryAttempt::failed(
                Self::NAME,
                "cached outcome expired",
                0,
                elapsed_ms(started),
            ),
        }
    }
}

// ---------------------------------------------------------------------------

/// Switch the system into emergency mode and return a degraded result
pub struct EmergencyEscalation {
    emergency: Arc<EmergencyState>,
}

impl EmergencyEscalation {
    /// Strategy name
    pub const NAME: &'static str = "emergency-escalation";

    /// Create the strategy
    pub fn new(emergency: Arc<EmergencyState>) -> Self {
        Self { emergency }
    }
}

#[async_trait]
impl RecoveryStrategy for EmergencyEscalation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> u32 {
        5
    }

    fn matches(&self, failure: &Outcome, _context: &RecoveryContext) -> bool {
        failure.is_critical_failure()
    }

    async fn apply(&self, failure: &Outcome, context: &RecoveryContext) -> RecoveryAttempt {
        let started = Instant::now();
        let reason = format!(
            "critical {} failure in '{}': {}",
            failure.kind(),
            context.request.skill_name,
            failure.message()
        );
        warn!(reason = %reason, "Escalating to emergency mode");
        self.emergency.activate(reason.clone()).await;

        let payload = json!({
            "mode": "limited_operations",
            "skill": context.request.skill_name,
            "reason": reason,
        });
        RecoveryAttempt::succeeded(Self::NAME, Some(payload), 0, elapsed_ms(started))
    }
}
