//! Typed failure classification
//!
//! Backends set a [`FailureKind`] on every failed execution. A message may
//! also mention phrases from several vocabularies at once ("fatal error:
//! connection refused"), so [`FailureKind::classify_all`] reports every kind
//! it mentions. [`FailureKind::classify`] picks the primary kind for errors
//! that arrive untyped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a backend execution failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Execution exceeded its deadline
    Timeout,
    /// Backend throttled the caller
    RateLimit,
    /// Account or usage quota exhausted
    QuotaExceeded,
    /// Backend endpoint refused the connection
    ConnectionRefused,
    /// Requested model does not exist on the backend
    ModelNotFound,
    /// Request or response payload too large
    PayloadTooLarge,
    /// Backend ran out of memory
    OutOfMemory,
    /// A declared limit was exceeded
    LimitExceeded,
    /// Security policy violation
    Security,
    /// Credentials rejected
    Authentication,
    /// Caller lacks permission
    Authorization,
    /// Unrecoverable backend failure
    Fatal,
    /// Backend reported a critical condition
    Critical,
    /// Anything else
    Other,
}

/// Message fragments mapped to kinds, checked in order
const VOCABULARY: &[(&str, FailureKind)] = &[
    ("timeout", FailureKind::Timeout),
    ("timed out", FailureKind::Timeout),
    ("rate limit", FailureKind::RateLimit),
    ("quota", FailureKind::QuotaExceeded),
    ("connection refused", FailureKind::ConnectionRefused),
    ("econnrefused", FailureKind::ConnectionRefused),
    ("model not found", FailureKind::ModelNotFound),
    ("too large", FailureKind::PayloadTooLarge),
    ("memory", FailureKind::OutOfMemory),
    ("limit exceeded", FailureKind::LimitExceeded),
    ("security", FailureKind::Security),
    ("authentication", FailureKind::Authentication),
    ("authorization", FailureKind::Authorization),
    ("fatal", FailureKind::Fatal),
    ("critical", FailureKind::Critical),
];

impl FailureKind {
    /// Classify an untyped error message
    pub fn classify(message: &str) -> Self {
        let lowered = message.to_lowercase();
        VOCABULARY
            .iter()
            .find(|(needle, _)| lowered.contains(needle))
            .map_or(Self::Other, |(_, kind)| *kind)
    }

    /// Every kind whose phrase appears in `message`, in vocabulary order
    pub fn classify_all(message: &str) -> Vec<Self> {
        let lowered = message.to_lowercase();
        let mut kinds: Vec<Self> = Vec::new();
        for (needle, kind) in VOCABULARY {
            if lowered.contains(needle) && !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
        kinds
    }

    /// Transient failures another provider may not share
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            Self::Timeout
                | Self::RateLimit
                | Self::QuotaExceeded
                | Self::ConnectionRefused
                | Self::ModelNotFound
        )
    }

    /// Failures that a smaller input may avoid
    pub fn is_complexity(self) -> bool {
        matches!(
            self,
            Self::PayloadTooLarge | Self::OutOfMemory | Self::Timeout | Self::LimitExceeded
        )
    }

    /// Failures that require operator attention
    pub fn is_critical(self) -> bool {
        matches!(
            self,
            Self::Security | Self::Authentication | Self::Authorization | Self::Fatal | Self::Critical
        )
    }

    /// Stable snake_case label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::RateLimit => "rate_limit",
            Self::QuotaExceeded => "quota_exceeded",
            Self::ConnectionRefused => "connection_refused",
            Self::ModelNotFound => "model_not_found",
            Self::PayloadTooLarge => "payload_too_large",
            Self::OutOfMemory => "out_of_memory",
            Self::LimitExceeded => "limit_exceeded",
            Self::Security => "security",
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::Fatal => "fatal",
            Self::Critical => "critical",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
