//! Recovery attempt value objects

use crate::constants::STRATEGY_EXHAUSTED;
use crate::value_objects::Outcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of one recovery strategy application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryAttempt {
    /// Strategy that produced this attempt
    pub strategy_name: String,
    /// Whether the strategy recovered the failure
    pub success: bool,
    /// Output produced by the recovery
    pub result_payload: Option<serde_json::Value>,
    /// Provider that served the recovered result, if any
    pub provider_name: Option<String>,
    /// Executions spent by the strategy
    pub attempts_used: u32,
    /// Why the strategy failed
    pub error_message: Option<String>,
    /// Result came from the outcome cache
    pub from_cache: bool,
    /// Time spent in the strategy
    pub duration_ms: u64,
    /// Completion time
    pub timestamp: DateTime<Utc>,
    /// Execution outcome behind a recovered result, when one was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl RecoveryAttempt {
    /// A successful attempt
    pub fn succeeded(
        strategy_name: impl Into<String>,
        result_payload: Option<serde_json::Value>,
        attempts_used: u32,
        duration_ms: u64,
    ) -> Self {
        Self {
            strategy_name: strategy_name.into(),
            success: true,
            result_payload,
            provider_name: None,
            attempts_used,
            error_message: None,
            from_cache: false,
            duration_ms,
            timestamp: Utc::now(),
            outcome: None,
        }
    }

    /// A failed attempt
    pub fn failed(
        strategy_name: impl Into<String>,
        error_message: impl Into<String>,
        attempts_used: u32,
        duration_ms: u64,
    ) -> Self {
        Self {
            strategy_name: strategy_name.into(),
            success: false,
            result_payload: None,
            provider_name: None,
            attempts_used,
            error_message: Some(error_message.into()),
            from_cache: false,
            duration_ms,
            timestamp: Utc::now(),
            outcome: None,
        }
    }

    /// The terminal attempt reported when no strategy recovered
    pub fn exhausted(error_message: impl Into<String>, duration_ms: u64) -> Self {
        Self::failed(STRATEGY_EXHAUSTED, error_message, 0, duration_ms)
    }

    /// Attach the provider that served the result
    pub fn with_provider(mut self, provider_name: impl Into<String>) -> Self {
        self.provider_name = Some(provider_name.into());
        self
    }

    /// Attach the execution outcome behind the result
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.provider_name = Some(outcome.provider_name.clone());
        self.outcome = Some(outcome);
        self
    }

    /// Mark the result as served from cache
    pub fn from_cache(mut self) -> Self {
        self.from_cache = true;
        self
    }

    /// Whether this is the terminal exhausted marker
    pub fn is_exhausted(&self) -> bool {
        self.strategy_name == STRATEGY_EXHAUSTED
    }
}
