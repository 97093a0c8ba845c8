//! Provider value objects
//!
//! A provider is an interchangeable execution backend. Its static metadata
//! (capabilities, cost, budgets) drives eligibility during selection.

use crate::constants::CAPABILITY_ALL;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where a provider runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Runs on this machine, no marginal cost
    Local,
    /// Hosted API
    #[default]
    Remote,
}

/// Execution backend descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    /// Unique provider name
    pub name: String,
    /// Local or remote
    pub kind: ProviderKind,
    /// Whether the provider may be selected
    pub available: bool,
    /// Selection priority, lower is preferred
    pub priority: i32,
    /// Advertised capability tags
    pub capabilities: BTreeSet<String>,
    /// Cost charged per call
    pub cost_per_call: Option<f64>,
    /// Input budget in estimated units
    pub max_input_units: Option<u64>,
    /// Output budget in estimated units
    pub max_output_units: Option<u64>,
    /// Per-provider execution timeout, overrides the gateway default
    pub timeout_ms: Option<u64>,
}

impl Provider {
    /// Create an available provider with no capabilities
    pub fn new(name: impl Into<String>, kind: ProviderKind) -> Self {
        Self {
            name: name.into(),
            kind,
            available: true,
            priority: 0,
            capabilities: BTreeSet::new(),
            cost_per_call: None,
            max_input_units: None,
            max_output_units: None,
            timeout_ms: None,
        }
    }

    /// Create a local provider
    pub fn local(name: impl Into<String>) -> Self {
        Self::new(name, ProviderKind::Local)
    }

    /// Create a remote provider
    pub fn remote(name: impl Into<String>) -> Self {
        Self::new(name, ProviderKind::Remote)
    }

    /// Set the selection priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Add capability tags
    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities
            .extend(capabilities.into_iter().map(Into::into));
        self
    }

    /// Set the per-call cost
    pub fn with_cost_per_call(mut self, cost: f64) -> Self {
        self.cost_per_call = Some(cost);
        self
    }

    /// Set the input budget
    pub fn with_max_input_units(mut self, units: u64) -> Self {
        self.max_input_units = Some(units);
        self
    }

    /// Set the output budget
    pub fn with_max_output_units(mut self, units: u64) -> Self {
        self.max_output_units = Some(units);
        self
    }

    /// Set the execution timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Set availability
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Whether this provider runs locally
    pub fn is_local(&self) -> bool {
        self.kind == ProviderKind::Local
    }

    /// Whether the advertised capabilities satisfy every required tag
    pub fn supports(&self, required: &BTreeSet<String>) -> bool {
        self.capabilities.contains(CAPABILITY_ALL) || required.is_subset(&self.capabilities)
    }

    /// Whether an input of `units` fits the declared budget
    pub fn accepts_input(&self, units: u64) -> bool {
        self.max_input_units.is_none_or(|max| units <= max)
    }
}
