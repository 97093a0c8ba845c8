//! Provider registry
//!
//! Holds every known provider in registration order. Registration order is
//! the final tie-breaker during selection, so the registry is a `Vec` rather
//! than a map.

use acey_domain::error::{Error, Result};
use acey_domain::value_objects::Provider;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Registered providers, unique by name
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: RwLock<Vec<Provider>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Provider>> {
        self.providers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Provider>> {
        self.providers.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a provider
    ///
    /// # Errors
    ///
    /// `DuplicateProvider` when the name is taken, `InvalidArgument` when the
    /// descriptor itself is malformed.
    pub fn register(&self, provider: Provider) -> Result<()> {
        validate(&provider)?;
        let mut providers = self.write();
        if providers.iter().any(|p| p.name == provider.name) {
            return Err(Error::duplicate_provider(&provider.name));
        }
        info!(
            provider = %provider.name,
            kind = ?provider.kind,
            priority = provider.priority,
            "Provider registered"
        );
        providers.push(provider);
        Ok(())
    }

    /// Flip a provider's availability flag
    ///
    /// Returns whether the flag actually changed.
    ///
    /// # Errors
    ///
    /// `NotFound` when no provider has that name.
    pub fn set_availability(&self, name: &str, available: bool) -> Result<bool> {
        let mut providers = self.write();
        let provider = providers
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::not_found(format!("provider '{name}'")))?;
        if provider.available == available {
            return Ok(false);
        }
        provider.available = available;
        info!(provider = %name, available, "Provider availability changed");
        Ok(true)
    }

    /// Remove a provider, returning it when it existed
    pub fn remove(&self, name: &str) -> Option<Provider> {
        let mut providers = self.write();
        let index = providers.iter().position(|p| p.name == name)?;
        debug!(provider = %name, "Provider removed");
        Some(providers.remove(index))
    }

    /// Look up a provider by name
    pub fn get(&self, name: &str) -> Option<Provider> {
        self.read().iter().find(|p| p.name == name).cloned()
    }

    /// Copy of every provider in registration order
    pub fn snapshot(&self) -> Vec<Provider> {
        self.read().clone()
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no provider is registered
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

fn validate(provider: &Provider) -> Result<()> {
    if provider.name.trim().is_empty() {
        return Err(Error::invalid_argument("provider name must not be empty"));
    }
    let cost = provider.cost_per_call.unwrap_or(0.0);
    if !(cost.is_finite() && cost >= 0.0) {
        return Err(Error::invalid_argument(format!(
            "provider '{}' has invalid cost_per_call {cost}",
            provider.name
        )));
    }
    if provider.max_input_units == Some(0) {
        return Err(Error::invalid_argument(format!(
            "provider '{}' max_input_units must be positive",
            provider.name
        )));
    }
    if provider.timeout_ms == Some(0) {
        return Err(Error::invalid_argument(format!(
            "provider '{}' timeout_ms must be positive",
            provider.name
        )));
    }
    Ok(())
}
