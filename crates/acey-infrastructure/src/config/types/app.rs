//! Main application configuration

use super::{DispatchConfig, EventBusConfig, LoggingConfig, ProviderConfig, SchedulerConfig};
use acey_application::RecoverySettings;
use serde::{Deserialize, Serialize};

/// Root configuration, one field per TOML section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `[logging]`
    pub logging: LoggingConfig,
    /// `[event_bus]`
    pub event_bus: EventBusConfig,
    /// `[dispatch]`
    pub dispatch: DispatchConfig,
    /// `[recovery]`
    pub recovery: RecoverySettings,
    /// `[scheduler]`, including `[[scheduler.jobs]]`
    pub scheduler: SchedulerConfig,
    /// `[[providers]]`
    pub providers: Vec<ProviderConfig>,
}
