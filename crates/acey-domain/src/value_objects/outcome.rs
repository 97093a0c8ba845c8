//! Execution outcome value objects

use crate::constants::{QUALITY_FAST_EXECUTION_MS, QUALITY_SLOW_EXECUTION_MS};
use crate::value_objects::FailureKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Quality score of an execution
///
/// ```
/// use acey_domain::value_objects::quality_score;
///
/// // 0.5 + 0.3 + (0.9 - 0.5) * 0.3 + 0.1
/// assert!((quality_score(true, 0.9, 200) - 1.0).abs() < 1e-9);
/// ```
pub fn quality_score(success: bool, confidence: f64, duration_ms: u64) -> f64 {
    let confidence = confidence.clamp(0.0, 1.0);
    let mut quality = 0.5;
    if success {
        quality += 0.3;
    }
    quality += (confidence - 0.5) * 0.3;
    if duration_ms < QUALITY_FAST_EXECUTION_MS {
        quality += 0.1;
    }
    if duration_ms > QUALITY_SLOW_EXECUTION_MS {
        quality -= 0.1;
    }
    quality.clamp(0.0, 1.0)
}

/// Result of one execution attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Request this outcome belongs to
    pub request_id: Uuid,
    /// Provider that produced it
    pub provider_name: String,
    /// Whether the attempt succeeded
    pub success: bool,
    /// Opaque output on success
    pub output: Option<serde_json::Value>,
    /// Failure description
    pub error_message: Option<String>,
    /// Failure classification
    pub failure_kind: Option<FailureKind>,
    /// Backend-reported confidence in [0, 1]
    pub confidence: f64,
    /// Quality score in [0, 1]
    pub quality: f64,
    /// Cost charged for the attempt
    pub cost_incurred: f64,
    /// Wall-clock duration
    pub duration_ms: u64,
    /// Output served from the outcome cache
    pub from_cache: bool,
    /// Recovery strategy that produced this outcome, if any
    pub recovered_by: Option<String>,
    /// Creation time
    pub timestamp: DateTime<Utc>,
}

impl Outcome {
    /// A failed attempt; failures always score zero quality
    pub fn failure(
        request_id: Uuid,
        provider_name: impl Into<String>,
        kind: FailureKind,
        message: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            request_id,
            provider_name: provider_name.into(),
            success: false,
            output: None,
            error_message: Some(message.into()),
            failure_kind: Some(kind),
            confidence: 0.0,
            quality: 0.0,
            cost_incurred: 0.0,
            duration_ms,
            from_cache: false,
            recovered_by: None,
            timestamp: Utc::now(),
        }
    }

    /// Failure kind, defaulting to `Other` for successes
    pub fn kind(&self) -> FailureKind {
        self.failure_kind.unwrap_or(FailureKind::Other)
    }

    /// Failure message, or an empty string
    pub fn message(&self) -> &str {
        self.error_message.as_deref().unwrap_or_default()
    }

    /// Typed kind followed by every other kind the message mentions
    pub fn failure_kinds(&self) -> Vec<FailureKind> {
        let mut kinds = vec![self.kind()];
        for kind in FailureKind::classify_all(self.message()) {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }

    /// Whether the failure is worth re-routing to another provider
    pub fn is_transient_failure(&self) -> bool {
        !self.success && self.failure_kinds().into_iter().any(FailureKind::is_transient)
    }

    /// Whether a smaller input may avoid the failure
    pub fn is_complexity_failure(&self) -> bool {
        !self.success && self.failure_kinds().into_iter().any(FailureKind::is_complexity)
    }

    /// Whether the failure needs operator attention
    pub fn is_critical_failure(&self) -> bool {
        !self.success && self.failure_kinds().into_iter().any(FailureKind::is_critical)
    }
}
