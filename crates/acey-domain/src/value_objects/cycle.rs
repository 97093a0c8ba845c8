//! Scheduling cycle value objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health grade of a completed cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleHealth {
    /// Nearly every execution succeeded
    Excellent,
    /// Most executions succeeded
    Good,
    /// Many executions failed
    Poor,
    /// The cycle failed or almost nothing succeeded
    Critical,
}

impl CycleHealth {
    /// Grade a cycle by outcome and success ratio
    pub fn grade(success: bool, executed: usize, succeeded: usize) -> Self {
        if !success {
            return Self::Critical;
        }
        if executed == 0 {
            return Self::Good;
        }
        let ratio = succeeded as f64 / executed as f64;
        if ratio >= 0.95 {
            Self::Excellent
        } else if ratio >= 0.8 {
            Self::Good
        } else if ratio >= 0.5 {
            Self::Poor
        } else {
            Self::Critical
        }
    }
}

/// What a cycle callback reports back to the scheduler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Executions attempted
    pub executed: usize,
    /// Executions that succeeded
    pub succeeded: usize,
    /// Non-fatal errors collected during the cycle
    pub errors: Vec<String>,
    /// New proposals produced by the cycle
    pub proposals: usize,
    /// Anomalies observed during the cycle
    pub anomalies: usize,
}

/// Immutable history entry for one cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    /// Monotonic cycle number
    pub cycle_number: u64,
    /// Start time
    pub started_at: DateTime<Utc>,
    /// End time
    pub ended_at: DateTime<Utc>,
    /// Whether the cycle succeeded
    pub success: bool,
    /// Executions attempted
    pub executed: usize,
    /// Executions that succeeded
    pub succeeded: usize,
    /// Errors reported by or raised from the callback
    pub errors: Vec<String>,
    /// Health grade
    pub health: CycleHealth,
}

impl CycleRecord {
    /// Cycle duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        u64::try_from((self.ended_at - self.started_at).num_milliseconds()).unwrap_or(0)
    }
}
