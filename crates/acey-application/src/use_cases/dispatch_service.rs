//! Request dispatch use case
//!
//! `submit_request` is the single entry point for skill execution:
//!
//! 1. trust check (denied requests never reach a backend)
//! 2. provider selection
//! 3. execution through the gateway
//! 4. on failure, the recovery chain (when enabled)
//!
//! Every path ends in either an [`Outcome`] or a typed [`DispatchFailure`].

use crate::domain_services::execution_stats::ProviderStats;
use crate::domain_services::gateway::ExecutionGateway;
use crate::domain_services::outcome_cache::OutcomeCache;
use crate::domain_services::recovery::{
    FallbackProvider, RecoveryChain, RecoveryContext, RecoveryStats, RetryWithBackoff,
};
use crate::domain_services::registry::ProviderRegistry;
use crate::domain_services::selector::ProviderSelector;
use crate::ports::services::SkillDispatcher;
use acey_domain::error::Result;
use acey_domain::events::{DomainEvent, ProviderChange};
use acey_domain::ports::SharedEventBus;
use acey_domain::value_objects::{
    DispatchFailure, DispatchFailureKind, DispatchResult, Outcome, Provider, RecoveryAttempt,
    SkillRequest, quality_score,
};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Aggregate execution statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStats {
    /// Per-provider counters
    pub providers: BTreeMap<String, ProviderStats>,
    /// Outcomes currently in the learning log
    pub learning_log_len: usize,
    /// Recovery counters
    pub recovery: RecoveryStats,
    /// Approximate outcome cache size
    pub cached_outcomes: u64,
}

/// Selection, execution and recovery behind one call
pub struct DispatchService {
    registry: Arc<ProviderRegistry>,
    selector: Arc<ProviderSelector>,
    gateway: Arc<ExecutionGateway>,
    recovery: Arc<RecoveryChain>,
    cache: OutcomeCache,
    events: SharedEventBus,
    recovery_enabled: bool,
}

impl DispatchService {
    /// Wire the dispatch pipeline
    pub fn new(
        selector: Arc<ProviderSelector>,
        gateway: Arc<ExecutionGateway>,
        recovery: Arc<RecoveryChain>,
        cache: OutcomeCache,
        events: SharedEventBus,
        recovery_enabled: bool,
    ) -> Self {
        Self {
            registry: Arc::clone(selector.registry()),
            selector,
            gateway,
            recovery,
            cache,
            events,
            recovery_enabled,
        }
    }

    /// Submit a request and wait for its final result
    #[instrument(skip_all, fields(request_id = %request.id, skill = %request.skill_name))]
    pub async fn submit_request(&self, request: SkillRequest) -> DispatchResult {
        if !request.trust.permitted {
            warn!(trust = ?request.trust.level, "Request denied by trust policy");
            return Err(DispatchFailure::new(
                request.id,
                DispatchFailureKind::ConstitutionalDenial,
                format!(
                    "request for '{}' denied at trust level {:?}",
                    request.skill_name, request.trust.level
                ),
            ));
        }

        let Some(provider) = self.selector.select(&request) else {
            return Err(DispatchFailure::new(
                request.id,
                DispatchFailureKind::SelectionFailure,
                format!("no eligible provider for skill '{}'", request.skill_name),
            ));
        };

        let outcome = self.gateway.execute(&request, &provider).await;
        if outcome.success {
            self.cache.store(&request, &outcome).await;
            return Ok(outcome);
        }

        if !self.recovery_enabled {
            return Err(DispatchFailure::new(
                request.id,
                DispatchFailureKind::ExecutionFailure,
                outcome.message().to_string(),
            )
            .with_outcome(outcome));
        }

        let context = RecoveryContext::new(request.clone(), provider);
        let report = self.recovery.handle(&outcome, &context).await;
        if !report.recovered() {
            return Err(DispatchFailure::new(
                request.id,
                DispatchFailureKind::RecoveryExhausted,
                report
                    .resolution
                    .error_message
                    .clone()
                    .unwrap_or_else(|| outcome.message().to_string()),
            )
            .with_outcome(outcome)
            .with_attempts(report.trail));
        }

        let resolution = report.resolution;
        info!(strategy = %resolution.strategy_name, "Request recovered");
        let recovered = recovered_outcome(&request, &outcome, resolution);
        if matches!(
            recovered.recovered_by.as_deref(),
            Some(RetryWithBackoff::NAME | FallbackProvider::NAME)
        ) {
            self.cache.store(&request, &recovered).await;
        }
        Ok(recovered)
    }

    /// Add a provider and announce it
    pub async fn register_provider(&self, provider: Provider) -> Result<()> {
        let name = provider.name.clone();
        self.registry.register(provider)?;
        self.announce(name, ProviderChange::Registered).await;
        Ok(())
    }

    /// Change a provider's availability; returns whether it changed
    pub async fn set_provider_availability(&self, name: &str, available: bool) -> Result<bool> {
        let changed = self.registry.set_availability(name, available)?;
        if changed {
            self.announce(
                name.to_string(),
                ProviderChange::AvailabilityChanged { available },
            )
            .await;
        }
        Ok(changed)
    }

    /// Remove a provider; `None` when it was not registered
    pub async fn remove_provider(&self, name: &str) -> Option<Provider> {
        let removed = self.registry.remove(name)?;
        self.announce(name.to_string(), ProviderChange::Removed)
            .await;
        Some(removed)
    }

    async fn announce(&self, name: String, change: ProviderChange) {
        if let Err(e) = self
            .events
            .publish_event(DomainEvent::ProviderChanged { name, change })
            .await
        {
            warn!(error = %e, "Failed to publish provider change");
        }
    }

    /// Registered providers in registration order
    pub fn providers(&self) -> Vec<Provider> {
        self.registry.snapshot()
    }

    /// The selector used for routing
    pub fn selector(&self) -> &Arc<ProviderSelector> {
        &self.selector
    }

    /// The recovery chain
    pub fn recovery(&self) -> &Arc<RecoveryChain> {
        &self.recovery
    }

    /// Aggregate statistics
    pub fn execution_stats(&self) -> ExecutionStats {
        ExecutionStats {
            providers: self.gateway.stats(),
            learning_log_len: self.gateway.learning_log().len(),
            recovery: self.recovery.stats(),
            cached_outcomes: self.cache.entry_count(),
        }
    }

    /// Reset execution and recovery statistics
    pub fn reset_stats(&self) {
        self.gateway.reset_stats();
        self.recovery.reset_stats();
    }

    /// High-quality outcomes kept for learning
    pub fn learning_log(&self) -> Vec<Outcome> {
        self.gateway.learning_log()
    }
}

#[async_trait]
impl SkillDispatcher for DispatchService {
    async fn submit_request(&self, request: SkillRequest) -> DispatchResult {
        DispatchService::submit_request(self, request).await
    }
}

/// Turn a successful recovery attempt into the caller's outcome
fn recovered_outcome(
    request: &SkillRequest,
    failed: &Outcome,
    resolution: RecoveryAttempt,
) -> Outcome {
    let strategy = resolution.strategy_name;
    match resolution.outcome {
        Some(mut outcome) => {
            outcome.request_id = request.id;
            outcome.from_cache = resolution.from_cache;
            outcome.recovered_by = Some(strategy);
            outcome
        }
        // Degraded result with no execution behind it
        None => Outcome {
            request_id: request.id,
            provider_name: resolution
                .provider_name
                .unwrap_or_else(|| failed.provider_name.clone()),
            success: true,
            output: resolution.result_payload,
            error_message: None,
            failure_kind: None,
            confidence: 0.0,
            quality: quality_score(true, 0.0, resolution.duration_ms),
            cost_incurred: 0.0,
            duration_ms: resolution.duration_ms,
            from_cache: resolution.from_cache,
            recovered_by: Some(strategy),
            timestamp: Utc::now(),
        },
    }
}
