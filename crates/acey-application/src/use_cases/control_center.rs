//! Operator control surface
//!
//! One façade over dispatch, scheduling and alerting for CLIs and embedding
//! applications.

use super::dispatch_service::{DispatchService, ExecutionStats};
use crate::domain_services::alerts::AlertLog;
use crate::domain_services::scheduler::{CycleScheduler, SchedulerStatus};
use acey_domain::error::Result;
use acey_domain::ports::{DomainEventStream, SharedEventBus};
use acey_domain::value_objects::{Alert, CycleRecord, DispatchResult, Provider, SkillRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Combined status of the scheduler and provider pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    /// Scheduler snapshot
    pub scheduler: SchedulerStatus,
    /// Registered providers
    pub providers: Vec<Provider>,
    /// Providers currently available
    pub available_providers: usize,
}

/// Entry point for operators
pub struct ControlCenter {
    dispatch: Arc<DispatchService>,
    scheduler: Arc<CycleScheduler>,
    alerts: Arc<AlertLog>,
    events: SharedEventBus,
}

impl ControlCenter {
    /// Assemble the control surface
    pub fn new(
        dispatch: Arc<DispatchService>,
        scheduler: Arc<CycleScheduler>,
        alerts: Arc<AlertLog>,
        events: SharedEventBus,
    ) -> Self {
        Self {
            dispatch,
            scheduler,
            alerts,
            events,
        }
    }

    /// Dispatch service
    pub fn dispatch(&self) -> &Arc<DispatchService> {
        &self.dispatch
    }

    /// Cycle scheduler
    pub fn scheduler(&self) -> &Arc<CycleScheduler> {
        &self.scheduler
    }

    /// Submit a skill request
    pub async fn submit_request(&self, request: SkillRequest) -> DispatchResult {
        self.dispatch.submit_request(request).await
    }

    /// Register a provider
    ///
    /// Only the registry learns about the provider; the backend executor must
    /// already route its name. `AppContext::add_provider` in the
    /// infrastructure crate does both.
    pub async fn register_provider(&self, provider: Provider) -> Result<()> {
        self.dispatch.register_provider(provider).await
    }

    /// Change provider availability
    pub async fn set_provider_availability(&self, name: &str, available: bool) -> Result<bool> {
        self.dispatch
            .set_provider_availability(name, available)
            .await
    }

    /// Remove a provider
    pub async fn remove_provider(&self, name: &str) -> Option<Provider> {
        self.dispatch.remove_provider(name).await
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<()> {
        self.scheduler.start().await
    }

    /// Stop the scheduler
    pub async fn stop(&self) -> Result<()> {
        self.scheduler.stop().await
    }

    /// Pause the scheduler
    pub async fn pause(&self) -> bool {
        self.scheduler.pause().await
    }

    /// Resume the scheduler
    pub async fn resume(&self) -> bool {
        self.scheduler.resume().await
    }

    /// Change the cycle interval
    pub async fn set_interval_ms(&self, interval_ms: u64) -> Result<()> {
        self.scheduler.set_interval_ms(interval_ms).await
    }

    /// Enter emergency mode
    pub async fn enable_emergency_mode(&self, reason: &str) -> bool {
        self.scheduler.enable_emergency_mode(reason).await
    }

    /// Leave emergency mode
    pub async fn disable_emergency_mode(&self) -> bool {
        self.scheduler.disable_emergency_mode().await
    }

    /// Scheduler and provider status
    pub fn get_status(&self) -> SystemStatus {
        let providers = self.dispatch.providers();
        SystemStatus {
            scheduler: self.scheduler.status(),
            available_providers: providers.iter().filter(|p| p.available).count(),
            providers,
        }
    }

    /// Most recent cycles, oldest first
    pub fn get_cycle_history(&self, limit: usize) -> Vec<CycleRecord> {
        self.scheduler.cycle_history(limit)
    }

    /// Most recent alerts, oldest first
    pub fn get_recent_alerts(&self, limit: usize) -> Vec<Alert> {
        self.alerts.recent(limit)
    }

    /// Mark an alert resolved
    pub fn acknowledge_alert(&self, id: Uuid) -> bool {
        self.alerts.acknowledge(id)
    }

    /// Execution and recovery statistics
    pub fn get_execution_stats(&self) -> ExecutionStats {
        self.dispatch.execution_stats()
    }

    /// Reset execution and recovery statistics
    pub fn reset_stats(&self) {
        self.dispatch.reset_stats();
    }

    /// Subscribe to domain events
    pub async fn subscribe_events(&self) -> Result<DomainEventStream> {
        self.events.subscribe_events().await
    }
}
