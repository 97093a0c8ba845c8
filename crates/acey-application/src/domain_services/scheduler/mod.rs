//! Cycle scheduler
//!
//! Drives a [`CycleRunner`] on a fixed interval:
//!
//! ```text
//!            start                pause
//! Stopped ----------> Running ----------> Paused
//!    ^                  |  ^                 |
//!    |       stop       |  |     resume      |
//!    +------------------+  +-----------------+
//! ```
//!
//! `start` runs cycle #1 before arming the timer. Ticks that land while the
//! scheduler is paused are no-ops and do not advance the cycle counter.
//!
//! After `max_consecutive_failures` failed cycles in a row the scheduler
//! pauses itself and enters emergency mode. Emergency mode is sticky: only
//! [`CycleScheduler::disable_emergency_mode`] clears it. When another
//! component (the recovery chain) turns emergency mode on, the scheduler
//! pauses at its next tick.

mod history;

pub use history::CycleHistory;

use super::alerts::{AlertLog, cycle_alerts, health_alert};
use super::emergency::EmergencyState;
use acey_domain::constants::{
    ALERT_CAPACITY, ALERT_FREQUENCY_THRESHOLD, SCHEDULER_DEFAULT_INTERVAL_MS,
    SCHEDULER_HEALTH_CHECK_INTERVAL_MS, SCHEDULER_HISTORY_CAPACITY,
    SCHEDULER_HISTORY_RETENTION_SECS, SCHEDULER_MAX_CONSECUTIVE_FAILURES,
};
use acey_domain::error::{Error, Result};
use acey_domain::events::DomainEvent;
use acey_domain::ports::{CycleRunner, SharedEventBus};
use acey_domain::value_objects::{Alert, AlertSeverity, CycleHealth, CycleRecord};
use chrono::{TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const SCHEDULER_SOURCE: &str = "scheduler";
const HEALTH_SOURCE: &str = "health-monitor";

/// Scheduler timing and safety thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// Time between cycles
    pub interval_ms: u64,
    /// Failed cycles in a row before emergency mode
    pub max_consecutive_failures: u32,
    /// How long cycle records are kept
    pub history_retention_secs: u64,
    /// Most cycle records kept, whatever their age
    pub history_capacity: usize,
    /// Health check period; zero disables the health monitor
    pub health_check_interval_ms: u64,
    /// Alerts kept in the alert log
    pub alert_capacity: usize,
    /// Warnings per hour above which the health monitor complains
    pub alert_frequency_threshold: usize,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            interval_ms: SCHEDULER_DEFAULT_INTERVAL_MS,
            max_consecutive_failures: SCHEDULER_MAX_CONSECUTIVE_FAILURES,
            history_retention_secs: SCHEDULER_HISTORY_RETENTION_SECS,
            history_capacity: SCHEDULER_HISTORY_CAPACITY,
            health_check_interval_ms: SCHEDULER_HEALTH_CHECK_INTERVAL_MS,
            alert_capacity: ALERT_CAPACITY,
            alert_frequency_threshold: ALERT_FREQUENCY_THRESHOLD,
        }
    }
}

/// Scheduler lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    /// No timer armed
    Stopped,
    /// Cycles run on every tick
    Running,
    /// Timer armed, ticks ignored
    Paused,
}

/// Snapshot returned by [`CycleScheduler::status`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerStatus {
    /// Lifecycle state
    pub state: SchedulerState,
    /// Whether emergency mode is on
    pub emergency_mode: bool,
    /// Why emergency mode is on
    pub emergency_reason: Option<String>,
    /// Number of the most recent cycle
    pub current_cycle: u64,
    /// Failed cycles since the last success
    pub consecutive_failures: u32,
    /// Current interval
    pub interval_ms: u64,
    /// Time since the last start, while not stopped
    pub uptime_secs: Option<u64>,
    /// Cycles run since creation
    pub total_cycles: u64,
    /// Cycles that succeeded
    pub successful_cycles: u64,
    /// Most recent cycle record
    pub last_cycle: Option<CycleRecord>,
    /// Alerts not yet acknowledged
    pub unresolved_alerts: usize,
}

impl SchedulerStatus {
    /// Success ratio over every cycle run
    pub fn success_rate(&self) -> f64 {
        match self.total_cycles {
            0 => 0.0,
            n => self.successful_cycles as f64 / n as f64,
        }
    }
}

#[derive(Debug)]
struct Counters {
    state: SchedulerState,
    current_cycle: u64,
    consecutive_failures: u32,
    interval_ms: u64,
    started_at: Option<Instant>,
    total_cycles: u64,
    successful_cycles: u64,
    last_cycle: Option<CycleRecord>,
}

/// State shared between the scheduler handle and its timer tasks
struct SchedulerCore {
    settings: SchedulerSettings,
    runner: Arc<dyn CycleRunner>,
    alerts: Arc<AlertLog>,
    emergency: Arc<EmergencyState>,
    events: SharedEventBus,
    counters: Mutex<Counters>,
    history: Mutex<CycleHistory>,
    // Serializes cycles: a manual run never overlaps a timer tick
    cycle_gate: tokio::sync::Mutex<()>,
}

/// Background tasks of an armed scheduler
struct Timers {
    cancel: CancellationToken,
    cycle_task: JoinHandle<()>,
    health_task: Option<JoinHandle<()>>,
}

impl Timers {
    async fn shutdown(self) {
        self.cancel.cancel();
        let tasks = std::iter::once(self.cycle_task).chain(self.health_task);
        for task in tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Scheduler task ended abnormally");
            }
        }
    }
}

/// Periodic cycle driver with emergency shutdown
pub struct CycleScheduler {
    core: Arc<SchedulerCore>,
    timers: tokio::sync::Mutex<Option<Timers>>,
}

impl CycleScheduler {
    /// Create a stopped scheduler
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the interval, failure threshold or history
    /// capacity is zero.
    pub fn new(
        settings: SchedulerSettings,
        runner: Arc<dyn CycleRunner>,
        alerts: Arc<AlertLog>,
        emergency: Arc<EmergencyState>,
        events: SharedEventBus,
    ) -> Result<Self> {
        if settings.interval_ms == 0 {
            return Err(Error::invalid_argument("scheduler interval must be positive"));
        }
        if settings.max_consecutive_failures == 0 {
            return Err(Error::invalid_argument(
                "max_consecutive_failures must be positive",
            ));
        }
        if settings.history_capacity == 0 {
            return Err(Error::invalid_argument("history_capacity must be positive"));
        }
        let counters = Counters {
            state: SchedulerState::Stopped,
            current_cycle: 0,
            consecutive_failures: 0,
            interval_ms: settings.interval_ms,
            started_at: None,
            total_cycles: 0,
            successful_cycles: 0,
            last_cycle: None,
        };
        let history = CycleHistory::new(settings.history_retention_secs, settings.history_capacity);
        Ok(Self {
            core: Arc::new(SchedulerCore {
                settings,
                runner,
                alerts,
                emergency,
                events,
                counters: Mutex::new(counters),
                history: Mutex::new(history),
                cycle_gate: tokio::sync::Mutex::new(()),
            }),
            timers: tokio::sync::Mutex::new(None),
        })
    }

    /// Start cycling: run cycle #1 now, then one cycle per interval
    ///
    /// Starting a running scheduler does nothing; starting a paused one
    /// resumes it.
    pub async fn start(&self) -> Result<()> {
        let mut timers = self.timers.lock().await;
        match self.core.state() {
            SchedulerState::Running => return Ok(()),
            SchedulerState::Paused => {
                drop(timers);
                self.resume().await;
                return Ok(());
            }
            SchedulerState::Stopped => {}
        }

        let (interval_ms, current_cycle) = {
            let mut counters = self.core.counters();
            counters.state = SchedulerState::Running;
            counters.started_at = Some(Instant::now());
            (counters.interval_ms, counters.current_cycle)
        };
        info!(interval_ms, current_cycle, "Scheduler started");
        self.core
            .publish(DomainEvent::SchedulerStarted {
                interval_ms,
                current_cycle,
            })
            .await;

        self.core.tick().await;
        *timers = Some(SchedulerCore::arm(&self.core, interval_ms));
        Ok(())
    }

    /// Stop cycling and disarm the timer
    ///
    /// Waits for an in-progress cycle to finish.
    pub async fn stop(&self) -> Result<()> {
        let mut timers = self.timers.lock().await;
        if self.core.state() == SchedulerState::Stopped {
            return Ok(());
        }
        if let Some(armed) = timers.take() {
            armed.shutdown().await;
        }
        let current_cycle = {
            let mut counters = self.core.counters();
            counters.state = SchedulerState::Stopped;
            counters.started_at = None;
            counters.current_cycle
        };
        info!(current_cycle, "Scheduler stopped");
        self.core
            .publish(DomainEvent::SchedulerStopped { current_cycle })
            .await;
        Ok(())
    }

    /// Suspend cycling without disarming the timer
    ///
    /// Returns `false` when the scheduler was not running.
    pub async fn pause(&self) -> bool {
        if !self
            .core
            .transition(SchedulerState::Running, SchedulerState::Paused)
        {
            return false;
        }
        self.core.publish(DomainEvent::SchedulerPaused).await;
        self.core
            .alerts
            .raise(AlertSeverity::Info, SCHEDULER_SOURCE, "Scheduler paused")
            .await;
        true
    }

    /// Resume a paused scheduler
    ///
    /// Refused while emergency mode is active; returns `false` when nothing
    /// changed.
    pub async fn resume(&self) -> bool {
        if self.core.emergency.is_active() {
            warn!("Resume refused while emergency mode is active");
            return false;
        }
        if !self
            .core
            .transition(SchedulerState::Paused, SchedulerState::Running)
        {
            return false;
        }
        self.core.publish(DomainEvent::SchedulerResumed).await;
        self.core
            .alerts
            .raise(AlertSeverity::Info, SCHEDULER_SOURCE, "Scheduler resumed")
            .await;
        true
    }

    /// Change the cycle interval
    ///
    /// A running scheduler restarts (stop, then start). A paused one re-arms
    /// its timer and stays paused. A stopped one just remembers the value.
    pub async fn set_interval_ms(&self, interval_ms: u64) -> Result<()> {
        if interval_ms == 0 {
            return Err(Error::invalid_argument("scheduler interval must be positive"));
        }
        let state = {
            let mut counters = self.core.counters();
            counters.interval_ms = interval_ms;
            counters.state
        };
        info!(interval_ms, state = ?state, "Scheduler interval changed");

        match state {
            SchedulerState::Running => {
                self.stop().await?;
                self.start().await?;
            }
            SchedulerState::Paused => {
                let mut timers = self.timers.lock().await;
                if let Some(armed) = timers.take() {
                    armed.shutdown().await;
                }
                *timers = Some(SchedulerCore::arm(&self.core, interval_ms));
            }
            SchedulerState::Stopped => {}
        }
        Ok(())
    }

    /// Run one cycle right away, regardless of state
    pub async fn run_cycle_now(&self) -> CycleRecord {
        self.core.run_cycle().await
    }

    /// Run the health monitor check right away
    pub async fn run_health_check(&self) -> Alert {
        self.core.health_check().await
    }

    /// Enter emergency mode and pause
    ///
    /// Returns `false` when emergency mode was already on.
    pub async fn enable_emergency_mode(&self, reason: &str) -> bool {
        self.core.enter_emergency(reason).await
    }

    /// Leave emergency mode, reset the failure streak and resume
    ///
    /// Returns `false` when emergency mode was already off.
    pub async fn disable_emergency_mode(&self) -> bool {
        if !self
            .core
            .emergency
            .deactivate("cleared by operator")
            .await
        {
            return false;
        }
        self.core.counters().consecutive_failures = 0;
        if self
            .core
            .transition(SchedulerState::Paused, SchedulerState::Running)
        {
            self.core.publish(DomainEvent::SchedulerResumed).await;
        }
        self.core
            .alerts
            .raise(
                AlertSeverity::Info,
                SCHEDULER_SOURCE,
                "Emergency mode cleared, normal operations resumed",
            )
            .await;
        true
    }

    /// Current lifecycle state
    pub fn state(&self) -> SchedulerState {
        self.core.state()
    }

    /// Full status snapshot
    pub fn status(&self) -> SchedulerStatus {
        let emergency_mode = self.core.emergency.is_active();
        let emergency_reason = self.core.emergency.reason();
        let unresolved_alerts = self.core.alerts.unresolved();
        let counters = self.core.counters();
        SchedulerStatus {
            state: counters.state,
            emergency_mode,
            emergency_reason,
            current_cycle: counters.current_cycle,
            consecutive_failures: counters.consecutive_failures,
            interval_ms: counters.interval_ms,
            uptime_secs: counters.started_at.map(|t| t.elapsed().as_secs()),
            total_cycles: counters.total_cycles,
            successful_cycles: counters.successful_cycles,
            last_cycle: counters.last_cycle.clone(),
            unresolved_alerts,
        }
    }

    /// The `limit` most recent cycles, oldest first
    pub fn cycle_history(&self, limit: usize) -> Vec<CycleRecord> {
        self.core.history().recent(limit)
    }

    /// Alert log the scheduler writes to
    pub fn alerts(&self) -> &Arc<AlertLog> {
        &self.core.alerts
    }

    /// Emergency flag the scheduler honors
    pub fn emergency(&self) -> &Arc<EmergencyState> {
        &self.core.emergency
    }

    /// Settings the scheduler was created with
    pub fn settings(&self) -> &SchedulerSettings {
        &self.core.settings
    }
}

impl SchedulerCore {
    fn counters(&self) -> MutexGuard<'_, Counters> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn history(&self) -> MutexGuard<'_, CycleHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state(&self) -> SchedulerState {
        self.counters().state
    }

    fn transition(&self, from: SchedulerState, to: SchedulerState) -> bool {
        let mut counters = self.counters();
        if counters.state != from {
            return false;
        }
        counters.state = to;
        true
    }

    async fn publish(&self, event: DomainEvent) {
        let name = event.name();
        if let Err(e) = self.events.publish_event(event).await {
            warn!(event = name, error = %e, "Failed to publish scheduler event");
        }
    }

    /// Spawn the cycle timer and health monitor
    fn arm(core: &Arc<Self>, interval_ms: u64) -> Timers {
        let cancel = CancellationToken::new();

        let cycle_task = {
            let core = Arc::clone(core);
            let token = cancel.clone();
            let period = Duration::from_millis(interval_ms);
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        () = token.cancelled() => break,
                        _ = ticker.tick() => core.tick().await,
                    }
                }
                debug!("Cycle timer disarmed");
            })
        };

        let health_task = (core.settings.health_check_interval_ms > 0).then(|| {
            let core = Arc::clone(core);
            let token = cancel.clone();
            let period = Duration::from_millis(core.settings.health_check_interval_ms);
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        () = token.cancelled() => break,
                        _ = ticker.tick() => {
                            core.health_check().await;
                        }
                    }
                }
            })
        });

        Timers {
            cancel,
            cycle_task,
            health_task,
        }
    }

    async fn tick(&self) {
        if self.emergency.is_active() {
            if self.transition(SchedulerState::Running, SchedulerState::Paused) {
                self.publish(DomainEvent::SchedulerPaused).await;
                let reason = self.emergency.reason().unwrap_or_default();
                self.alerts
                    .raise(
                        AlertSeverity::Warning,
                        SCHEDULER_SOURCE,
                        format!("Scheduler paused: emergency mode active ({reason})"),
                    )
                    .await;
            }
            return;
        }
        if self.state() != SchedulerState::Running {
            return;
        }
        self.run_cycle().await;
    }

    async fn run_cycle(&self) -> CycleRecord {
        let _gate = self.cycle_gate.lock().await;
        let cycle_number = {
            let mut counters = self.counters();
            counters.current_cycle += 1;
            counters.current_cycle
        };
        debug!(cycle = cycle_number, "Cycle started");

        let started_at = Utc::now();
        // The runner executes on its own task so a panic becomes a failed cycle
        let runner = Arc::clone(&self.runner);
        let joined = tokio::spawn(async move { runner.run_cycle(cycle_number).await }).await;
        let ended_at = Utc::now();

        let (report, errors) = match joined {
            Ok(Ok(report)) => {
                let errors = report.errors.clone();
                (Some(report), errors)
            }
            Ok(Err(e)) => (None, vec![e.to_string()]),
            Err(e) => (None, vec![format!("cycle callback panicked: {e}")]),
        };
        let success = report.is_some();
        let (executed, succeeded) = report
            .as_ref()
            .map_or((0, 0), |r| (r.executed, r.succeeded));
        let record = CycleRecord {
            cycle_number,
            started_at,
            ended_at,
            success,
            executed,
            succeeded,
            errors,
            health: CycleHealth::grade(success, executed, succeeded),
        };

        self.history().push(record.clone());
        let consecutive_failures = {
            let mut counters = self.counters();
            counters.total_cycles += 1;
            if success {
                counters.successful_cycles += 1;
                counters.consecutive_failures = 0;
            } else {
                counters.consecutive_failures += 1;
            }
            counters.last_cycle = Some(record.clone());
            counters.consecutive_failures
        };

        if success {
            info!(
                cycle = cycle_number,
                executed,
                succeeded,
                health = ?record.health,
                duration_ms = record.duration_ms(),
                "Cycle completed"
            );
        } else {
            warn!(
                cycle = cycle_number,
                consecutive_failures,
                errors = ?record.errors,
                "Cycle failed"
            );
        }

        self.publish(DomainEvent::CycleCompleted {
            record: record.clone(),
        })
        .await;
        for (severity, message) in cycle_alerts(&record, report.as_ref()) {
            self.alerts.raise(severity, SCHEDULER_SOURCE, message).await;
        }

        if !success && consecutive_failures >= self.settings.max_consecutive_failures {
            self.enter_emergency(&format!("{consecutive_failures} consecutive cycle failures"))
                .await;
        }
        record
    }

    async fn enter_emergency(&self, reason: &str) -> bool {
        let activated = self.emergency.activate(reason).await;
        if self.transition(SchedulerState::Running, SchedulerState::Paused) {
            self.publish(DomainEvent::SchedulerPaused).await;
        }
        if activated {
            self.alerts
                .raise(
                    AlertSeverity::Critical,
                    SCHEDULER_SOURCE,
                    format!("Emergency mode activated: {reason}"),
                )
                .await;
        }
        activated
    }

    async fn health_check(&self) -> Alert {
        let since = Utc::now() - TimeDelta::hours(1);
        let recent = self.alerts.count_since(since, AlertSeverity::Warning);
        let (uptime_secs, total_cycles, consecutive_failures) = {
            let counters = self.counters();
            (
                counters.started_at.map_or(0, |t| t.elapsed().as_secs()),
                counters.total_cycles,
                counters.consecutive_failures,
            )
        };
        let (severity, message) = health_alert(
            recent,
            self.settings.alert_frequency_threshold,
            uptime_secs,
            total_cycles,
            consecutive_failures,
        );
        self.alerts.raise(severity, HEALTH_SOURCE, message).await
    }
}
