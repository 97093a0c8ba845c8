use acey_application::{
    AlertLog, CycleScheduler, DispatchService, EmergencyState, ExecutionGateway, GatewaySettings,
    OutcomeCache, ProviderRegistry, ProviderSelector, RecoveryChain, RecoverySettings,
    SchedulerSettings,
};
use acey_domain::error::{Error, Result};
use acey_domain::events::DomainEvent;
use acey_domain::ports::{
    BackendExecutor, BackendResponse, CycleRunner, DomainEventStream, EventBusProvider,
    SharedEventBus,
};
use acey_domain::value_objects::{CycleReport, FailureKind, SkillRequest};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// What a scripted backend does on one call
#[derive(Debug, Clone)]
pub enum Reply {
    /// Successful response
    Ok {
        output: Value,
        confidence: f64,
        duration_ms: u64,
    },
    /// Response with `success = false`
    Failed(FailureKind, String),
    /// `Err(..)` from the backend
    Error(FailureKind, String),
}

impl Reply {
    /// Success with confidence 0.9 in 100ms
    pub fn ok(output: Value) -> Self {
        Self::Ok {
            output,
            confidence: 0.9,
            duration_ms: 100,
        }
    }

    /// Success with explicit confidence and duration
    pub fn ok_with(output: Value, confidence: f64, duration_ms: u64) -> Self {
        Self::Ok {
            output,
            confidence,
            duration_ms,
        }
    }

    /// Failed response
    pub fn failed(kind: FailureKind, message: &str) -> Self {
        Self::Failed(kind, message.to_string())
    }

    /// Backend error
    pub fn error(kind: FailureKind, message: &str) -> Self {
        Self::Error(kind, message.to_string())
    }

    fn into_result(self) -> Result<BackendResponse> {
        match self {
            Self::Ok {
                output,
                confidence,
                duration_ms,
            } => Ok(BackendResponse::ok(output, confidence, duration_ms)),
            Self::Failed(kind, message) => Ok(BackendResponse::failed(kind, message, 10)),
            Self::Error(kind, message) => Err(Error::backend(kind, message)),
        }
    }
}

/// Backend whose replies are scripted per provider
///
/// Queued replies are used first; once a provider's queue is empty its
/// `always` reply is used.
#[derive(Default)]
pub struct ScriptedBackend {
    queued: Mutex<HashMap<String, VecDeque<Reply>>>,
    always: Mutex<HashMap<String, Reply>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<(String, Value)>>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply used whenever nothing is queued for `provider`
    pub fn always(self, provider: &str, reply: Reply) -> Self {
        self.always
            .lock()
            .unwrap()
            .insert(provider.to_string(), reply);
        self
    }

    /// Queue a one-shot reply for `provider`
    pub fn then(self, provider: &str, reply: Reply) -> Self {
        self.queued
            .lock()
            .unwrap()
            .entry(provider.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Sleep before every reply from `provider`
    pub fn delay(self, provider: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap()
            .insert(provider.to_string(), delay);
        self
    }

    /// Provider names in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }

    /// Number of calls made to `provider`
    pub fn calls_for(&self, provider: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == provider)
            .count()
    }

    /// Payloads sent to `provider`, in call order
    pub fn payloads_for(&self, provider: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == provider)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    /// Highest number of simultaneous calls observed
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn next_reply(&self, provider: &str) -> Reply {
        if let Some(reply) = self
            .queued
            .lock()
            .unwrap()
            .get_mut(provider)
            .and_then(VecDeque::pop_front)
        {
            return reply;
        }
        self.always
            .lock()
            .unwrap()
            .get(provider)
            .cloned()
            .unwrap_or_else(|| Reply::error(FailureKind::Other, "no reply scripted"))
    }
}

#[async_trait]
impl BackendExecutor for ScriptedBackend {
    async fn invoke(&self, provider_name: &str, request: &SkillRequest) -> Result<BackendResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((provider_name.to_string(), request.payload.clone()));
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.lock().unwrap().get(provider_name).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self.next_reply(provider_name);

        self.active.fetch_sub(1, Ordering::SeqCst);
        reply.into_result()
    }
}

// ---------------------------------------------------------------------------
// Event bus
// ---------------------------------------------------------------------------

/// Event bus that keeps every published event
#[derive(Default)]
pub struct RecordingEventBus {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Number of events whose name is `name`
    pub fn count(&self, name: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.name() == name)
            .count()
    }
}

#[async_trait]
impl EventBusProvider for RecordingEventBus {
    async fn publish_event(&self, event: DomainEvent) -> Result<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }

    async fn subscribe_events(&self) -> Result<DomainEventStream> {
        Ok(Box::pin(futures::stream::empty()))
    }

    fn has_subscribers(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Cycle runner
// ---------------------------------------------------------------------------

/// What a scripted runner does on one cycle
#[derive(Debug, Clone)]
pub enum CycleStep {
    Succeed(CycleReport),
    Fail(String),
    Panic,
}

/// Cycle runner replaying a script, then repeating a default step
pub struct ScriptedRunner {
    script: Mutex<VecDeque<CycleStep>>,
    default_step: Mutex<CycleStep>,
    seen: Mutex<Vec<u64>>,
}

impl ScriptedRunner {
    /// Runner that succeeds with an empty report unless scripted otherwise
    pub fn succeeding() -> Self {
        Self::repeating(CycleStep::Succeed(CycleReport::default()))
    }

    /// Runner that always fails
    pub fn failing(message: &str) -> Self {
        Self::repeating(CycleStep::Fail(message.to_string()))
    }

    pub fn repeating(step: CycleStep) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_step: Mutex::new(step),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Queue a one-shot step
    pub fn then(self, step: CycleStep) -> Self {
        self.script.lock().unwrap().push_back(step);
        self
    }

    /// Replace the repeating step
    pub fn set_default(&self, step: CycleStep) {
        *self.default_step.lock().unwrap() = step;
    }

    /// Cycle numbers the runner was invoked with
    pub fn seen(&self) -> Vec<u64> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CycleRunner for ScriptedRunner {
    async fn run_cycle(&self, cycle_number: u64) -> Result<CycleReport> {
        self.seen.lock().unwrap().push(cycle_number);
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_step.lock().unwrap().clone());
        match step {
            CycleStep::Succeed(report) => Ok(report),
            CycleStep::Fail(message) => Err(Error::scheduler(message)),
            CycleStep::Panic => panic!("scripted cycle panic"),
        }
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

/// Recovery settings with short backoff
pub fn fast_recovery() -> RecoverySettings {
    RecoverySettings {
        base_backoff_ms: 10,
        max_backoff_ms: 100,
        ..RecoverySettings::default()
    }
}

/// Fully wired dispatch pipeline over a scripted backend
pub struct DispatchHarness {
    pub backend: Arc<ScriptedBackend>,
    pub events: Arc<RecordingEventBus>,
    pub registry: Arc<ProviderRegistry>,
    pub selector: Arc<ProviderSelector>,
    pub gateway: Arc<ExecutionGateway>,
    pub cache: OutcomeCache,
    pub emergency: Arc<EmergencyState>,
    pub recovery: Arc<RecoveryChain>,
    pub dispatch: Arc<DispatchService>,
}

impl DispatchHarness {
    pub fn new(backend: ScriptedBackend) -> Self {
        Self::with_settings(backend, fast_recovery(), GatewaySettings::default())
    }

    pub fn with_settings(
        backend: ScriptedBackend,
        recovery_settings: RecoverySettings,
        gateway_settings: GatewaySettings,
    ) -> Self {
        let backend = Arc::new(backend);
        let events = Arc::new(RecordingEventBus::new());
        let bus: SharedEventBus = events.clone();
        let registry = Arc::new(ProviderRegistry::new());
        let selector = Arc::new(ProviderSelector::new(Arc::clone(&registry), false));
        let gateway = Arc::new(ExecutionGateway::new(backend.clone(), gateway_settings));
        let cache = OutcomeCache::new(
            recovery_settings.cache_capacity,
            Duration::from_secs(recovery_settings.cache_retention_secs),
        );
        let emergency = Arc::new(EmergencyState::new(Arc::clone(&bus)));
        let recovery = Arc::new(RecoveryChain::with_defaults(
            &recovery_settings,
            Arc::clone(&gateway),
            Arc::clone(&selector),
            cache.clone(),
            Arc::clone(&emergency),
        ));
        let dispatch = Arc::new(DispatchService::new(
            Arc::clone(&selector),
            Arc::clone(&gateway),
            Arc::clone(&recovery),
            cache.clone(),
            bus,
            recovery_settings.enabled,
        ));
        Self {
            backend,
            events,
            registry,
            selector,
            gateway,
            cache,
            emergency,
            recovery,
            dispatch,
        }
    }
}

/// Scheduler over a scripted runner with its collaborators exposed
pub struct SchedulerHarness {
    pub runner: Arc<ScriptedRunner>,
    pub events: Arc<RecordingEventBus>,
    pub alerts: Arc<AlertLog>,
    pub emergency: Arc<EmergencyState>,
    pub scheduler: CycleScheduler,
}

impl SchedulerHarness {
    /// Interval of 1s, health monitor off
    pub fn new(runner: ScriptedRunner) -> Self {
        Self::with_settings(
            runner,
            SchedulerSettings {
                interval_ms: 1_000,
                health_check_interval_ms: 0,
                ..SchedulerSettings::default()
            },
        )
    }

    pub fn with_settings(runner: ScriptedRunner, settings: SchedulerSettings) -> Self {
        let runner = Arc::new(runner);
        let events = Arc::new(RecordingEventBus::new());
        let bus: SharedEventBus = events.clone();
        let alerts = Arc::new(AlertLog::new(settings.alert_capacity, Arc::clone(&bus)));
        let emergency = Arc::new(EmergencyState::new(Arc::clone(&bus)));
        let scheduler = CycleScheduler::new(
            settings,
            runner.clone(),
            Arc::clone(&alerts),
            Arc::clone(&emergency),
            bus,
        )
        .expect("valid scheduler settings");
        Self {
            runner,
            events,
            alerts,
            emergency,
            scheduler,
        }
    }

    /// Alerts of exactly `severity`
    pub fn alerts_of(&self, severity: acey_domain::value_objects::AlertSeverity) -> usize {
        self.alerts
            .recent(usize::MAX)
            .iter()
            .filter(|a| a.severity == severity)
            .count()
    }
}
