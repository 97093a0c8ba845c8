//! Execution gateway
//!
//! Runs one request on one provider. The gateway never returns an error:
//! backend errors, failed responses, timeouts and oversized output all come
//! back as a failed [`Outcome`] with a classified [`FailureKind`].
//!
//! Limits enforced here:
//! - at most `max_concurrency` executions run at once; the rest queue
//! - the same request id never executes twice concurrently
//! - each execution is bounded by the provider timeout, or the default

use super::execution_stats::{ExecutionStatsStore, ProviderStats};
use super::in_flight::InFlightRequests;
use acey_domain::constants::{
    EXECUTION_DEFAULT_MAX_CONCURRENCY, EXECUTION_DEFAULT_TIMEOUT_MS, LEARNING_LOG_CAPACITY,
    QUALITY_LEARNING_THRESHOLD,
};
use acey_domain::ports::{BackendExecutor, BackendResponse};
use acey_domain::value_objects::{
    FailureKind, Outcome, Provider, SkillRequest, estimate_units, quality_score,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

/// Gateway limits and learning thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Executions allowed to run at once
    pub max_concurrency: usize,
    /// Timeout for providers that declare none
    pub default_timeout_ms: u64,
    /// Minimum quality for an outcome to enter the learning log
    pub quality_threshold: f64,
    /// Entries kept in the learning log
    pub learning_log_capacity: usize,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            max_concurrency: EXECUTION_DEFAULT_MAX_CONCURRENCY,
            default_timeout_ms: EXECUTION_DEFAULT_TIMEOUT_MS,
            quality_threshold: QUALITY_LEARNING_THRESHOLD,
            learning_log_capacity: LEARNING_LOG_CAPACITY,
        }
    }
}

/// Bounded, concurrency-limited execution of requests on providers
pub struct ExecutionGateway {
    backend: Arc<dyn BackendExecutor>,
    settings: GatewaySettings,
    permits: Semaphore,
    in_flight: InFlightRequests,
    stats: ExecutionStatsStore,
    learning_log: Mutex<VecDeque<Outcome>>,
}

impl ExecutionGateway {
    /// Create a gateway in front of `backend`
    pub fn new(backend: Arc<dyn BackendExecutor>, settings: GatewaySettings) -> Self {
        let permits = Semaphore::new(settings.max_concurrency.max(1));
        Self {
            backend,
            settings,
            permits,
            in_flight: InFlightRequests::new(),
            stats: ExecutionStatsStore::new(),
            learning_log: Mutex::new(VecDeque::new()),
        }
    }

    /// Settings in effect
    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// Execute `request` on `provider`
    #[instrument(
        skip_all,
        fields(request_id = %request.id, skill = %request.skill_name, provider = %provider.name)
    )]
    pub async fn execute(&self, request: &SkillRequest, provider: &Provider) -> Outcome {
        let _claim = self.in_flight.acquire(request.id).await;
        let Ok(_permit) = self.permits.acquire().await else {
            return Outcome::failure(
                request.id,
                &provider.name,
                FailureKind::Fatal,
                "execution gateway is closed",
                0,
            );
        };

        let timeout_ms = provider
            .timeout_ms
            .unwrap_or(self.settings.default_timeout_ms);
        let started = Instant::now();
        let result = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            self.backend.invoke(&provider.name, request),
        )
        .await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let outcome = match result {
            Err(_) => {
                warn!(timeout_ms, "Execution timed out");
                Outcome::failure(
                    request.id,
                    &provider.name,
                    FailureKind::Timeout,
                    format!("execution timeout after {timeout_ms}ms"),
                    elapsed_ms,
                )
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Backend invocation failed");
                Outcome::failure(
                    request.id,
                    &provider.name,
                    e.failure_kind(),
                    e.to_string(),
                    elapsed_ms,
                )
            }
            Ok(Ok(response)) => build_outcome(request, provider, response, elapsed_ms),
        };

        debug!(
            success = outcome.success,
            quality = outcome.quality,
            duration_ms = outcome.duration_ms,
            "Execution finished"
        );
        self.stats.record(&outcome);
        self.remember(request, &outcome);
        outcome
    }

    fn remember(&self, request: &SkillRequest, outcome: &Outcome) {
        if !request.trust.permitted || outcome.quality < self.settings.quality_threshold {
            return;
        }
        let mut log = self
            .learning_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        log.push_back(outcome.clone());
        while log.len() > self.settings.learning_log_capacity {
            log.pop_front();
        }
    }

    /// Per-provider statistics
    pub fn stats(&self) -> BTreeMap<String, ProviderStats> {
        self.stats.snapshot()
    }

    /// Clear statistics and the learning log
    pub fn reset_stats(&self) {
        self.stats.reset();
        self.learning_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// High-quality outcomes kept for later learning, oldest first
    pub fn learning_log(&self) -> Vec<Outcome> {
        self.learning_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Executions currently holding a concurrency slot or request claim
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Concurrency slots currently free
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}

fn build_outcome(
    request: &SkillRequest,
    provider: &Provider,
    response: BackendResponse,
    elapsed_ms: u64,
) -> Outcome {
    let duration_ms = if response.duration_ms > 0 {
        response.duration_ms
    } else {
        elapsed_ms
    };

    if !response.success {
        let (kind, message) = match response.error {
            Some(failure) => (failure.kind, failure.message),
            None => (FailureKind::Other, "backend reported failure".to_string()),
        };
        return Outcome::failure(request.id, &provider.name, kind, message, duration_ms);
    }

    if let Some(limit) = provider.max_output_units {
        let produced = estimate_units(&response.output);
        if produced > limit {
            return Outcome::failure(
                request.id,
                &provider.name,
                FailureKind::LimitExceeded,
                format!("output exceeds provider limit: {produced} > {limit} units"),
                duration_ms,
            );
        }
    }

    let confidence = response.confidence.clamp(0.0, 1.0);
    Outcome {
        request_id: request.id,
        provider_name: provider.name.clone(),
        success: true,
        output: Some(response.output),
        error_message: None,
        failure_kind: None,
        confidence,
        quality: quality_score(true, confidence, duration_ms),
        cost_incurred: provider.cost_per_call.unwrap_or(0.0),
        duration_ms,
        from_cache: false,
        recovered_by: None,
        timestamp: Utc::now(),
    }
}
