//! Backend execution port
//!
//! The dispatch core never runs a model itself. It hands a request to a
//! [`BackendExecutor`] together with the selected provider's name and only
//! consumes the returned [`BackendResponse`]. Errors may come back either as
//! `Err(..)` or as a response with `success = false`; the gateway treats both
//! the same way.

use crate::error::Result;
use crate::value_objects::{FailureKind, SkillRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Typed failure reported inside a backend response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendFailure {
    /// Failure classification
    pub kind: FailureKind,
    /// Human-readable description
    pub message: String,
}

/// What a backend returns for one invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendResponse {
    /// Whether the invocation succeeded
    pub success: bool,
    /// Opaque output
    pub output: serde_json::Value,
    /// Backend confidence in the output, nominally in [0, 1]
    pub confidence: f64,
    /// Backend-measured duration
    pub duration_ms: u64,
    /// Failure details when `success` is false
    pub error: Option<BackendFailure>,
}

impl BackendResponse {
    /// A successful response
    pub fn ok(output: serde_json::Value, confidence: f64, duration_ms: u64) -> Self {
        Self {
            success: true,
            output,
            confidence,
            duration_ms,
            error: None,
        }
    }

    /// A failed response
    pub fn failed(kind: FailureKind, message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            success: false,
            output: serde_json::Value::Null,
            confidence: 0.0,
            duration_ms,
            error: Some(BackendFailure {
                kind,
                message: message.into(),
            }),
        }
    }
}

/// Routes an invocation to the backend serving `provider_name`
#[async_trait]
pub trait BackendExecutor: Send + Sync {
    /// Execute `request` on the named provider
    async fn invoke(&self, provider_name: &str, request: &SkillRequest) -> Result<BackendResponse>;
}

/// A single concrete backend (one model endpoint)
#[async_trait]
pub trait SkillBackend: Send + Sync {
    /// Backend implementation name, for logs
    fn backend_name(&self) -> &str;

    /// Execute `request`
    async fn invoke(&self, request: &SkillRequest) -> Result<BackendResponse>;
}
