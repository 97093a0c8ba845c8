//! Echo backend
//!
//! Dry-run backend that hands the payload back. Useful for wiring checks
//! and as the default provider when no model is configured.

use crate::constants::CONFIDENCE_ECHO;
use acey_domain::error::Result;
use acey_domain::ports::{BackendResponse, SkillBackend};
use acey_domain::value_objects::SkillRequest;
use async_trait::async_trait;
use std::time::Instant;

/// Backend returning `{ skill, echo }` for every request
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoBackend;

impl EchoBackend {
    /// Create an echo backend
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SkillBackend for EchoBackend {
    fn backend_name(&self) -> &str {
        "echo"
    }

    async fn invoke(&self, request: &SkillRequest) -> Result<BackendResponse> {
        let started = Instant::now();
        let output = serde_json::json!({
            "skill": request.skill_name,
            "echo": request.payload,
        });
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        Ok(BackendResponse::ok(output, CONFIDENCE_ECHO, duration_ms))
    }
}
