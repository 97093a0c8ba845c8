//! Service interfaces

use acey_domain::value_objects::{DispatchResult, SkillRequest};
use async_trait::async_trait;

/// Anything that can take a skill request through selection, execution and
/// recovery
#[async_trait]
pub trait SkillDispatcher: Send + Sync {
    /// Submit a request and wait for its final result
    async fn submit_request(&self, request: SkillRequest) -> DispatchResult;
}
