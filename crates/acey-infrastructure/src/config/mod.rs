//! Configuration management
//!
//! Typed configuration ([`AppConfig`]) and the Figment-based
//! [`ConfigLoader`] that merges defaults, a TOML file and `ACEY_`
//! environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{
    AppConfig, DispatchConfig, EventBusConfig, EventBusKind, LoggingConfig, ProviderConfig,
    SchedulerConfig,
};
