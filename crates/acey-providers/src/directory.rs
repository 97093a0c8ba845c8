//! Backend directory
//!
//! Maps provider names to the backend serving them. This is the
//! `BackendExecutor` handed to the execution gateway.

use acey_domain::error::{Error, Result};
use acey_domain::ports::{BackendExecutor, BackendResponse, SkillBackend};
use acey_domain::value_objects::SkillRequest;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Provider name to backend routing table
#[derive(Default)]
pub struct BackendDirectory {
    backends: DashMap<String, Arc<dyn SkillBackend>>,
}

impl BackendDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `provider_name` to `backend`, replacing any previous route
    pub fn register(&self, provider_name: impl Into<String>, backend: Arc<dyn SkillBackend>) {
        let provider_name = provider_name.into();
        debug!(
            provider = %provider_name,
            backend = backend.backend_name(),
            "backend registered"
        );
        self.backends.insert(provider_name, backend);
    }

    /// Drop the route for `provider_name`
    pub fn remove(&self, provider_name: &str) -> bool {
        self.backends.remove(provider_name).is_some()
    }

    /// Whether `provider_name` has a backend
    pub fn contains(&self, provider_name: &str) -> bool {
        self.backends.contains_key(provider_name)
    }

    /// Routed provider names, sorted
    pub fn provider_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.backends.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of routes
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Whether no route exists
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

#[async_trait]
impl BackendExecutor for BackendDirectory {
    async fn invoke(&self, provider_name: &str, request: &SkillRequest) -> Result<BackendResponse> {
        // Clone the handle out so no shard lock is held across the await
        let backend = self
            .backends
            .get(provider_name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::not_found(format!("backend for provider {provider_name}")))?;
        backend.invoke(request).await
    }
}
