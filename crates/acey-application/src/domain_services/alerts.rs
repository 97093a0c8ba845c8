//! Alert log and alert rules
//!
//! The log is a ring buffer: once full, the oldest alert is dropped. Every
//! alert is also written to the tracing log at a level matching its severity
//! and published on the event bus.

use acey_domain::constants::ALERT_CAPACITY;
use acey_domain::events::DomainEvent;
use acey_domain::ports::SharedEventBus;
use acey_domain::value_objects::{Alert, AlertSeverity, CycleHealth, CycleRecord, CycleReport};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Bounded, ordered log of operator alerts
pub struct AlertLog {
    alerts: Mutex<VecDeque<Alert>>,
    capacity: usize,
    events: SharedEventBus,
}

impl AlertLog {
    /// Create a log keeping the `capacity` most recent alerts
    pub fn new(capacity: usize, events: SharedEventBus) -> Self {
        Self {
            alerts: Mutex::new(VecDeque::with_capacity(capacity.min(ALERT_CAPACITY))),
            capacity: capacity.max(1),
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Alert>> {
        self.alerts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record and publish an alert
    pub async fn raise(
        &self,
        severity: AlertSeverity,
        source: &str,
        message: impl Into<String>,
    ) -> Alert {
        let alert = Alert::new(severity, source, message);
        match severity {
            AlertSeverity::Info => info!(source, message = %alert.message, "Alert"),
            AlertSeverity::Warning => warn!(source, message = %alert.message, "Alert"),
            AlertSeverity::Error | AlertSeverity::Critical => {
                error!(source, severity = %severity, message = %alert.message, "Alert");
            }
        }
        {
            let mut alerts = self.lock();
            alerts.push_back(alert.clone());
            while alerts.len() > self.capacity {
                alerts.pop_front();
            }
        }
        let event = DomainEvent::Alert {
            alert: alert.clone(),
        };
        if let Err(e) = self.events.publish_event(event).await {
            warn!(error = %e, "Failed to publish alert");
        }
        alert
    }

    /// The `limit` most recent alerts, oldest first
    pub fn recent(&self, limit: usize) -> Vec<Alert> {
        let alerts = self.lock();
        let skip = alerts.len().saturating_sub(limit);
        alerts.iter().skip(skip).cloned().collect()
    }

    /// Mark an alert resolved; returns `false` when it is no longer held
    pub fn acknowledge(&self, id: Uuid) -> bool {
        let mut alerts = self.lock();
        match alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.resolved = true;
                true
            }
            None => false,
        }
    }

    /// Alerts at or above `min_severity` raised after `since`
    pub fn count_since(&self, since: DateTime<Utc>, min_severity: AlertSeverity) -> usize {
        self.lock()
            .iter()
            .filter(|a| a.timestamp >= since && a.severity >= min_severity)
            .count()
    }

    /// Unresolved alerts currently held
    pub fn unresolved(&self) -> usize {
        self.lock().iter().filter(|a| !a.resolved).count()
    }

    /// Alerts currently held
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Alerts a completed cycle warrants, in emission order
pub fn cycle_alerts(
    record: &CycleRecord,
    report: Option<&CycleReport>,
) -> Vec<(AlertSeverity, String)> {
    let mut alerts = Vec::new();
    let n = record.cycle_number;

    if !record.success {
        let cause = record
            .errors
            .first()
            .map_or("unknown error", String::as_str);
        alerts.push((AlertSeverity::Error, format!("Cycle {n} failed: {cause}")));
        return alerts;
    }

    if let Some(report) = report {
        if report.proposals > 0 {
            alerts.push((
                AlertSeverity::Info,
                format!("Cycle {n} produced {} proposal(s)", report.proposals),
            ));
        }
        if report.anomalies > 0 {
            alerts.push((
                AlertSeverity::Warning,
                format!("Cycle {n} detected {} anomaly(ies)", report.anomalies),
            ));
        }
    }

    match record.health {
        CycleHealth::Poor => alerts.push((
            AlertSeverity::Warning,
            format!(
                "Cycle {n} health is poor: {}/{} executions succeeded",
                record.succeeded, record.executed
            ),
        )),
        CycleHealth::Critical => alerts.push((
            AlertSeverity::Error,
            format!(
                "Cycle {n} health is critical: {}/{} executions succeeded",
                record.succeeded, record.executed
            ),
        )),
        CycleHealth::Excellent | CycleHealth::Good => {}
    }
    alerts
}

/// Alert for the periodic health check
pub fn health_alert(
    recent_warnings: usize,
    threshold: usize,
    uptime_secs: u64,
    total_cycles: u64,
    consecutive_failures: u32,
) -> (AlertSeverity, String) {
    if recent_warnings > threshold {
        (
            AlertSeverity::Warning,
            format!("High alert frequency: {recent_warnings} warnings or worse in the last hour"),
        )
    } else {
        (
            AlertSeverity::Info,
            format!(
                "Health check passed: uptime {uptime_secs}s, {total_cycles} cycles, \
                 {consecutive_failures} consecutive failures"
            ),
        )
    }
}
