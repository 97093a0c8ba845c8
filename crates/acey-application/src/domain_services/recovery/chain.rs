//! Ordered strategy chain

use super::{
    EmergencyEscalation, FallbackProvider, RecoveryContext, RecoverySettings, RecoveryStrategy,
    RetryWithBackoff, SimplifyInput, UseCache,
};
use crate::domain_services::emergency::EmergencyState;
use crate::domain_services::gateway::ExecutionGateway;
use crate::domain_services::outcome_cache::OutcomeCache;
use crate::domain_services::selector::ProviderSelector;
use acey_domain::value_objects::{Outcome, RecoveryAttempt};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Result of running the chain on one failure
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryReport {
    /// The successful attempt, or the `exhausted` marker
    pub resolution: RecoveryAttempt,
    /// Every strategy attempt made, in order (excludes the exhausted marker)
    pub trail: Vec<RecoveryAttempt>,
}

impl RecoveryReport {
    /// Whether a strategy recovered the failure
    pub fn recovered(&self) -> bool {
        self.resolution.success
    }
}

/// Counters for one strategy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyStats {
    /// Times applied
    pub attempts: u64,
    /// Times it recovered
    pub successes: u64,
}

/// Cumulative recovery statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryStats {
    /// Failures handed to the chain
    pub failures_handled: u64,
    /// Failures a strategy recovered
    pub recovered: u64,
    /// Failures nothing recovered
    pub exhausted: u64,
    /// Per-strategy counters
    pub by_strategy: BTreeMap<String, StrategyStats>,
}

impl RecoveryStats {
    /// Recovered share of handled failures
    pub fn recovery_rate(&self) -> f64 {
        match self.failures_handled {
            0 => 0.0,
            n => self.recovered as f64 / n as f64,
        }
    }
}

/// Priority-ordered recovery strategies with attempt history
pub struct RecoveryChain {
    strategies: Vec<Arc<dyn RecoveryStrategy>>,
    history: Mutex<VecDeque<RecoveryAttempt>>,
    history_capacity: usize,
    stats: Mutex<RecoveryStats>,
}

impl RecoveryChain {
    /// Empty chain keeping `history_capacity` attempts
    pub fn new(history_capacity: usize) -> Self {
        Self {
            strategies: Vec::new(),
            history: Mutex::new(VecDeque::new()),
            history_capacity: history_capacity.max(1),
            stats: Mutex::new(RecoveryStats::default()),
        }
    }

    /// The five built-in strategies wired to the given services
    pub fn with_defaults(
        settings: &RecoverySettings,
        gateway: Arc<ExecutionGateway>,
        selector: Arc<ProviderSelector>,
        cache: OutcomeCache,
        emergency: Arc<EmergencyState>,
    ) -> Self {
        Self::new(settings.history_capacity)
            .with_strategy(Arc::new(RetryWithBackoff::new(
                Arc::clone(&gateway),
                settings.max_retries,
                settings.base_backoff_ms,
                settings.max_backoff_ms,
            )))
            .with_strategy(Arc::new(FallbackProvider::new(
                Arc::clone(&gateway),
                selector,
                settings.fallback_enabled,
                settings.max_fallbacks,
            )))
            .with_strategy(Arc::new(SimplifyInput::new(gateway)))
            .with_strategy(Arc::new(UseCache::new(cache)))
            .with_strategy(Arc::new(EmergencyEscalation::new(emergency)))
    }

    /// Add a strategy; equal priorities keep insertion order
    #[must_use]
    pub fn with_strategy(mut self, strategy: Arc<dyn RecoveryStrategy>) -> Self {
        self.strategies.push(strategy);
        self.strategies.sort_by_key(|s| s.priority());
        self
    }

    /// Strategy names in the order they are tried
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the chain on a failed outcome
    #[instrument(
        skip_all,
        fields(request_id = %context.request.id, provider = %context.provider.name, kind = %failure.kind())
    )]
    pub async fn handle(&self, failure: &Outcome, context: &RecoveryContext) -> RecoveryReport {
        let started = Instant::now();
        let mut trail = Vec::new();

        for strategy in &self.strategies {
            if !strategy.matches(failure, context) {
                debug!(strategy = strategy.name(), "Strategy does not apply");
                continue;
            }
            info!(strategy = strategy.name(), "Applying recovery strategy");
            let attempt = strategy.apply(failure, context).await;
            self.record(&attempt);
            if attempt.success {
                info!(strategy = strategy.name(), "Failure recovered");
                self.finish(true);
                trail.push(attempt.clone());
                return RecoveryReport {
                    resolution: attempt,
                    trail,
                };
            }
            trail.push(attempt);
        }

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let resolution = RecoveryAttempt::exhausted(
            format!("no recovery strategy succeeded for: {}", failure.message()),
            elapsed_ms,
        );
        warn!(attempts = trail.len(), "Recovery exhausted");
        self.record(&resolution);
        self.finish(false);
        RecoveryReport { resolution, trail }
    }

    fn history_lock(&self) -> MutexGuard<'_, VecDeque<RecoveryAttempt>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stats_lock(&self) -> MutexGuard<'_, RecoveryStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, attempt: &RecoveryAttempt) {
        {
            let mut history = self.history_lock();
            history.push_back(attempt.clone());
            while history.len() > self.history_capacity {
                history.pop_front();
            }
        }
        if attempt.is_exhausted() {
            return;
        }
        let mut stats = self.stats_lock();
        let entry = stats
            .by_strategy
            .entry(attempt.strategy_name.clone())
            .or_default();
        entry.attempts += 1;
        if attempt.success {
            entry.successes += 1;
        }
    }

    fn finish(&self, recovered: bool) {
        let mut stats = self.stats_lock();
        stats.failures_handled += 1;
        if recovered {
            stats.recovered += 1;
        } else {
            stats.exhausted += 1;
        }
    }

    /// The `limit` most recent attempts, oldest first
    pub fn history(&self, limit: usize) -> Vec<RecoveryAttempt> {
        let history = self.history_lock();
        let skip = history.len().saturating_sub(limit);
        history.iter().skip(skip).cloned().collect()
    }

    /// Cumulative statistics
    pub fn stats(&self) -> RecoveryStats {
        self.stats_lock().clone()
    }

    /// Reset statistics and history
    pub fn reset_stats(&self) {
        *self.stats_lock() = RecoveryStats::default();
        self.history_lock().clear();
    }
}
