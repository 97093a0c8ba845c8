//! Dispatch result taxonomy
//!
//! Callers of `submit_request` never see a bare error: every failure carries
//! one of the [`DispatchFailureKind`] variants and, when recovery ran, the full
//! attempt trail.

use crate::value_objects::{Outcome, RecoveryAttempt};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Failure taxonomy of the dispatch core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchFailureKind {
    /// No eligible provider; the caller may queue and retry later
    SelectionFailure,
    /// Backend execution failed and recovery was not run
    ExecutionFailure,
    /// Every applicable recovery strategy failed, or none matched
    RecoveryExhausted,
    /// The scheduler's cycle callback failed
    SchedulerFault,
    /// The trust policy rejected the request before execution
    ConstitutionalDenial,
}

impl fmt::Display for DispatchFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SelectionFailure => "selection_failure",
            Self::ExecutionFailure => "execution_failure",
            Self::RecoveryExhausted => "recovery_exhausted",
            Self::SchedulerFault => "scheduler_fault",
            Self::ConstitutionalDenial => "constitutional_denial",
        };
        f.write_str(label)
    }
}

/// Typed failure returned to `submit_request` callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {reason}")]
pub struct DispatchFailure {
    /// Request that failed
    pub request_id: Uuid,
    /// Taxonomy kind
    pub kind: DispatchFailureKind,
    /// Human-readable reason
    pub reason: String,
    /// Failed execution outcome, when one was produced
    pub outcome: Option<Outcome>,
    /// Recovery attempts made before giving up
    pub attempts: Vec<RecoveryAttempt>,
}

impl DispatchFailure {
    /// Create a failure without an outcome or attempt trail
    pub fn new(request_id: Uuid, kind: DispatchFailureKind, reason: impl Into<String>) -> Self {
        Self {
            request_id,
            kind,
            reason: reason.into(),
            outcome: None,
            attempts: Vec::new(),
        }
    }

    /// Attach the failed outcome
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Attach the recovery trail
    pub fn with_attempts(mut self, attempts: Vec<RecoveryAttempt>) -> Self {
        self.attempts = attempts;
        self
    }
}

/// Result of submitting a request
pub type DispatchResult = std::result::Result<Outcome, DispatchFailure>;
