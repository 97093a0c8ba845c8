//! Per-provider execution statistics

use acey_domain::value_objects::Outcome;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Cost is accumulated in millionths so it fits an atomic integer
const COST_SCALE: f64 = 1_000_000.0;

#[derive(Debug, Default)]
struct ProviderCounters {
    successes: AtomicU64,
    failures: AtomicU64,
    total_duration_ms: AtomicU64,
    total_cost_micros: AtomicU64,
}

/// Point-in-time statistics for one provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderStats {
    /// Successful executions
    pub successes: u64,
    /// Failed executions
    pub failures: u64,
    /// Summed execution time
    pub total_duration_ms: u64,
    /// Summed cost of successful executions
    pub total_cost: f64,
}

impl ProviderStats {
    /// Total executions
    pub fn executions(&self) -> u64 {
        self.successes + self.failures
    }

    /// Success ratio in [0, 1], zero before the first execution
    pub fn success_rate(&self) -> f64 {
        match self.executions() {
            0 => 0.0,
            n => self.successes as f64 / n as f64,
        }
    }

    /// Mean execution time
    pub fn average_duration_ms(&self) -> u64 {
        self.total_duration_ms
            .checked_div(self.executions())
            .unwrap_or(0)
    }
}

/// Lock-free counters keyed by provider name
#[derive(Debug, Default)]
pub struct ExecutionStatsStore {
    counters: DashMap<String, ProviderCounters>,
}

impl ExecutionStatsStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one outcome against its provider
    pub fn record(&self, outcome: &Outcome) {
        let entry = self
            .counters
            .entry(outcome.provider_name.clone())
            .or_default();
        if outcome.success {
            entry.successes.fetch_add(1, Ordering::Relaxed);
        } else {
            entry.failures.fetch_add(1, Ordering::Relaxed);
        }
        entry
            .total_duration_ms
            .fetch_add(outcome.duration_ms, Ordering::Relaxed);
        if outcome.cost_incurred > 0.0 {
            let micros = (outcome.cost_incurred * COST_SCALE).round() as u64;
            entry.total_cost_micros.fetch_add(micros, Ordering::Relaxed);
        }
    }

    /// Copy of every provider's statistics, sorted by name
    pub fn snapshot(&self) -> BTreeMap<String, ProviderStats> {
        self.counters
            .iter()
            .map(|entry| {
                let c = entry.value();
                let stats = ProviderStats {
                    successes: c.successes.load(Ordering::Relaxed),
                    failures: c.failures.load(Ordering::Relaxed),
                    total_duration_ms: c.total_duration_ms.load(Ordering::Relaxed),
                    total_cost: c.total_cost_micros.load(Ordering::Relaxed) as f64 / COST_SCALE,
                };
                (entry.key().clone(), stats)
            })
            .collect()
    }

    /// Statistics for one provider
    pub fn get(&self, provider_name: &str) -> Option<ProviderStats> {
        self.snapshot().remove(provider_name)
    }

    /// Drop every counter
    pub fn reset(&self) {
        self.counters.clear();
    }
}
