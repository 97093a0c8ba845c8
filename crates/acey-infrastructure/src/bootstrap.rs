//! Composition root
//!
//! Builds the whole dispatch core from an [`AppConfig`]:
//!
//! ```text
//! AppConfig → BackendDirectory → ExecutionGateway ─┐
//!           → ProviderRegistry → ProviderSelector ─┼→ RecoveryChain → DispatchService
//!           → EventBus → EmergencyState, AlertLog ─┘                       │
//!                                         BatchCycleRunner ← ───────────────┘
//!                                                │
//!                                         CycleScheduler → ControlCenter
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let context = init_app(ConfigLoader::new().load()?).await?;
//! context.control().start().await?;
//! ```

use crate::config::AppConfig;
use crate::events::create_event_bus;
use crate::utils::TimedOperation;
use acey_application::{
    AlertLog, BatchCycleRunner, ControlCenter, CycleScheduler, DispatchService, EmergencyState,
    ExecutionGateway, OutcomeCache, ProviderRegistry, ProviderSelector, RecoveryChain,
    SkillDispatcher,
};
use acey_domain::error::{Error, Result};
use acey_domain::ports::{BackendExecutor, SharedEventBus, SkillBackend};
use acey_domain::value_objects::Provider;
use acey_providers::{BackendDirectory, create_backend};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Assembled system
pub struct AppContext {
    /// Configuration the system was built from
    pub config: Arc<AppConfig>,
    control: Arc<ControlCenter>,
    backends: Arc<BackendDirectory>,
    event_bus: SharedEventBus,
}

impl AppContext {
    /// Operator control surface
    pub fn control(&self) -> &Arc<ControlCenter> {
        &self.control
    }

    /// Provider name to backend routing
    pub fn backends(&self) -> &Arc<BackendDirectory> {
        &self.backends
    }

    /// Shared event bus
    pub fn event_bus(&self) -> &SharedEventBus {
        &self.event_bus
    }

    /// Add a provider at runtime together with the backend that serves it
    ///
    /// The route is installed before the provider becomes selectable and is
    /// withdrawn again when the registry rejects the provider.
    ///
    /// # Errors
    ///
    /// `DuplicateProvider` when the name is already routed or registered.
    pub async fn add_provider(
        &self,
        provider: Provider,
        backend: Arc<dyn SkillBackend>,
    ) -> Result<()> {
        if self.backends.contains(&provider.name) {
            return Err(Error::duplicate_provider(&provider.name));
        }
        let name = provider.name.clone();
        self.backends.register(&name, backend);
        if let Err(e) = self.control.register_provider(provider).await {
            self.backends.remove(&name);
            return Err(e);
        }
        Ok(())
    }

    /// Remove a provider and its backend route
    pub async fn remove_provider(&self, name: &str) -> Option<Provider> {
        let removed = self.control.remove_provider(name).await;
        self.backends.remove(name);
        removed
    }
}

/// Build every service described by `config`
///
/// Providers are registered in configuration order. The scheduler is
/// created stopped.
///
/// # Errors
///
/// Fails when a backend cannot be created, a provider is rejected by the
/// registry, or the scheduler settings are invalid.
pub async fn init_app(config: AppConfig) -> Result<AppContext> {
    let timer = TimedOperation::start();
    let config = Arc::new(config);
    let event_bus = create_event_bus(&config.event_bus);

    let backends = Arc::new(BackendDirectory::new());
    for provider in &config.providers {
        backends.register(&provider.name, create_backend(&provider.backend)?);
    }
    let executor: Arc<dyn BackendExecutor> = backends.clone();

    let registry = Arc::new(ProviderRegistry::new());
    let selector = Arc::new(ProviderSelector::new(
        registry,
        config.dispatch.cost_optimization,
    ));
    let gateway = Arc::new(ExecutionGateway::new(
        executor,
        config.dispatch.gateway_settings(),
    ));
    let recovery_settings = &config.recovery;
    let cache = OutcomeCache::new(
        recovery_settings.cache_capacity,
        Duration::from_secs(recovery_settings.cache_retention_secs),
    );
    let emergency = Arc::new(EmergencyState::new(Arc::clone(&event_bus)));
    let recovery = Arc::new(RecoveryChain::with_defaults(
        recovery_settings,
        Arc::clone(&gateway),
        Arc::clone(&selector),
        cache.clone(),
        Arc::clone(&emergency),
    ));
    let dispatch = Arc::new(DispatchService::new(
        selector,
        gateway,
        recovery,
        cache,
        Arc::clone(&event_bus),
        recovery_settings.enabled,
    ));
    for provider in &config.providers {
        dispatch.register_provider(provider.to_provider()).await?;
    }

    let scheduler_settings = config.scheduler.settings();
    let alerts = Arc::new(AlertLog::new(
        scheduler_settings.alert_capacity,
        Arc::clone(&event_bus),
    ));
    let dispatcher: Arc<dyn SkillDispatcher> = dispatch.clone();
    let runner = Arc::new(BatchCycleRunner::new(
        dispatcher,
        config.scheduler.jobs.clone(),
    ));
    let scheduler = Arc::new(CycleScheduler::new(
        scheduler_settings,
        runner,
        Arc::clone(&alerts),
        emergency,
        Arc::clone(&event_bus),
    )?);

    let control = Arc::new(ControlCenter::new(
        dispatch,
        scheduler,
        alerts,
        Arc::clone(&event_bus),
    ));

    info!(
        providers = config.providers.len(),
        jobs = config.scheduler.jobs.len(),
        elapsed_ms = timer.elapsed_ms(),
        "system assembled"
    );

    Ok(AppContext {
        config,
        control,
        backends,
        event_bus,
    })
}
