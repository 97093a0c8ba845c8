//! Provider configuration types

use acey_domain::value_objects::{Provider, ProviderKind};
use acey_providers::BackendConfig;
use serde::{Deserialize, Serialize};

fn default_available() -> bool {
    true
}

/// One `[[providers]]` entry: registry metadata plus its backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Unique provider name
    pub name: String,
    /// Local or remote
    #[serde(default)]
    pub kind: ProviderKind,
    /// Selection priority, lower is preferred
    #[serde(default)]
    pub priority: i32,
    /// Advertised capability tags
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Cost charged per call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_call: Option<f64>,
    /// Input budget in estimated units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_input_units: Option<u64>,
    /// Output budget in estimated units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_units: Option<u64>,
    /// Execution timeout, overrides `dispatch.default_timeout_ms`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Whether the provider starts out selectable
    #[serde(default = "default_available")]
    pub available: bool,
    /// Backend serving this provider
    #[serde(default)]
    pub backend: BackendConfig,
}

impl ProviderConfig {
    /// An available echo-backed provider with no capabilities
    pub fn new(name: impl Into<String>, kind: ProviderKind) -> Self {
        Self {
            name: name.into(),
            kind,
            priority: 0,
            capabilities: Vec::new(),
            cost_per_call: None,
            max_input_units: None,
            max_output_units: None,
            timeout_ms: None,
            available: true,
            backend: BackendConfig::default(),
        }
    }

    /// Registry entry described by this configuration
    pub fn to_provider(&self) -> Provider {
        Provider {
            name: self.name.clone(),
            kind: self.kind,
            available: self.available,
            priority: self.priority,
            capabilities: self.capabilities.iter().cloned().collect(),
            cost_per_call: self.cost_per_call,
            max_input_units: self.max_input_units,
            max_output_units: self.max_output_units,
            timeout_ms: self.timeout_ms,
        }
    }
}
