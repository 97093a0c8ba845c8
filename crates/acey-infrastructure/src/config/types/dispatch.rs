//! Dispatch configuration types

use acey_application::GatewaySettings;
use serde::{Deserialize, Serialize};

/// Selection and execution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Executions allowed to run at once
    pub max_concurrency: usize,
    /// Timeout for providers that declare none
    pub default_timeout_ms: u64,
    /// Minimum quality for the learning log, in [0, 1]
    pub quality_threshold: f64,
    /// Entries kept in the learning log
    pub learning_log_capacity: usize,
    /// Prefer the cheapest remote provider over priority order
    pub cost_optimization: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        let gateway = GatewaySettings::default();
        Self {
            max_concurrency: gateway.max_concurrency,
            default_timeout_ms: gateway.default_timeout_ms,
            quality_threshold: gateway.quality_threshold,
            learning_log_capacity: gateway.learning_log_capacity,
            cost_optimization: false,
        }
    }
}

impl DispatchConfig {
    /// Gateway settings carried by this section
    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            max_concurrency: self.max_concurrency,
            default_timeout_ms: self.default_timeout_ms,
            quality_threshold: self.quality_threshold,
            learning_log_capacity: self.learning_log_capacity,
        }
    }
}
