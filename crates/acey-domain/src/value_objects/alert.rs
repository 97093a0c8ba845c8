//! Operator alert value objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Alert severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Informational
    Info,
    /// Needs attention soon
    Warning,
    /// Something failed
    Error,
    /// Immediate operator action required
    Critical,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Operator-facing alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Unique alert id
    pub id: Uuid,
    /// Severity
    pub severity: AlertSeverity,
    /// Component that raised the alert
    pub source: String,
    /// Rendered message
    pub message: String,
    /// Emission time
    pub timestamp: DateTime<Utc>,
    /// Set by explicit acknowledgement only
    pub resolved: bool,
}

impl Alert {
    /// Create an unresolved alert
    pub fn new(
        severity: AlertSeverity,
        source: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            severity,
            source: source.into(),
            message: message.into(),
            timestamp: Utc::now(),
            resolved: false,
        }
    }
}
