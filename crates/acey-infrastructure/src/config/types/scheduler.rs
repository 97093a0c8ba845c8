//! Scheduler configuration types

use acey_application::{JobSpec, SchedulerSettings};
use serde::{Deserialize, Serialize};

/// Cycle timing, safety thresholds and the per-cycle job list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
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
    /// Jobs submitted on every cycle
    pub jobs: Vec<JobSpec>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let settings = SchedulerSettings::default();
        Self {
            interval_ms: settings.interval_ms,
            max_consecutive_failures: settings.max_consecutive_failures,
            history_retention_secs: settings.history_retention_secs,
            history_capacity: settings.history_capacity,
            health_check_interval_ms: settings.health_check_interval_ms,
            alert_capacity: settings.alert_capacity,
            alert_frequency_threshold: settings.alert_frequency_threshold,
            jobs: Vec::new(),
        }
    }
}

impl SchedulerConfig {
    /// Scheduler settings carried by this section
    pub fn settings(&self) -> SchedulerSettings {
        SchedulerSettings {
            interval_ms: self.interval_ms,
            max_consecutive_failures: self.max_consecutive_failures,
            history_retention_secs: self.history_retention_secs,
            history_capacity: self.history_capacity,
            health_check_interval_ms: self.health_check_interval_ms,
            alert_capacity: self.alert_capacity,
            alert_frequency_threshold: self.alert_frequency_threshold,
        }
    }
}
