//! Configuration loader
//!
//! Loads [`AppConfig`] with Figment. Sources are merged in this order, later
//! ones overriding earlier ones:
//!
//! 1. `AppConfig::default()`
//! 2. a TOML file, either explicit or found in the default locations
//! 3. environment variables prefixed `ACEY_`, with `__` between nested keys
//!    (e.g. `ACEY_SCHEDULER__INTERVAL_MS=60000`)

use crate::config::AppConfig;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use acey_domain::error::{Error, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use std::collections::BTreeSet;
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix, without the trailing underscore
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    #[must_use]
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    #[must_use]
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load and validate configuration from all sources
    ///
    /// # Errors
    ///
    /// `Configuration` when a source cannot be parsed or the merged result
    /// fails validation. A missing explicit file is logged, not an error.
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR),
        );

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Write `config` to `path` as TOML
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).io_context(format!(
            "Failed to write config file {}",
            path.as_ref().display()
        ))?;

        Ok(())
    }

    /// Explicit configuration file path, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// First existing file among the default locations
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let mut candidates = vec![
            current_dir.join(DEFAULT_CONFIG_FILENAME),
            current_dir
                .join(DEFAULT_CONFIG_DIR)
                .join(DEFAULT_CONFIG_FILENAME),
        ];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME));
        }
        if let Some(home_dir) = dirs::home_dir() {
            candidates.push(
                home_dir
                    .join(format!(".{DEFAULT_CONFIG_DIR}"))
                    .join(DEFAULT_CONFIG_FILENAME),
            );
        }

        candidates.into_iter().find(|path| path.exists())
    }
}

/// Validate every configuration section
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    parse_log_level(&config.logging.level)?;
    validate_event_bus_config(config)?;
    validate_dispatch_config(config)?;
    validate_scheduler_config(config)?;
    validate_provider_configs(config)?;
    Ok(())
}

fn validate_event_bus_config(config: &AppConfig) -> Result<()> {
    if config.event_bus.capacity == 0 {
        return Err(Error::config("Event bus capacity cannot be 0"));
    }
    Ok(())
}

fn validate_dispatch_config(config: &AppConfig) -> Result<()> {
    let dispatch = &config.dispatch;
    if dispatch.max_concurrency == 0 {
        return Err(Error::config("dispatch.max_concurrency cannot be 0"));
    }
    if dispatch.default_timeout_ms == 0 {
        return Err(Error::config("dispatch.default_timeout_ms cannot be 0"));
    }
    if !(0.0..=1.0).contains(&dispatch.quality_threshold) {
        return Err(Error::config(format!(
            "dispatch.quality_threshold must be within [0, 1], got {}",
            dispatch.quality_threshold
        )));
    }
    Ok(())
}

fn validate_scheduler_config(config: &AppConfig) -> Result<()> {
    let scheduler = &config.scheduler;
    if scheduler.interval_ms == 0 {
        return Err(Error::config("scheduler.interval_ms cannot be 0"));
    }
    if scheduler.max_consecutive_failures == 0 {
        return Err(Error::config(
            "scheduler.max_consecutive_failures cannot be 0",
        ));
    }
    if scheduler.history_capacity == 0 {
        return Err(Error::config("scheduler.history_capacity cannot be 0"));
    }
    if scheduler.alert_capacity == 0 {
        return Err(Error::config("scheduler.alert_capacity cannot be 0"));
    }
    if let Some(job) = scheduler.jobs.iter().find(|j| j.skill_name.trim().is_empty()) {
        return Err(Error::config(format!(
            "scheduler job has an empty skill name: {job:?}"
        )));
    }
    Ok(())
}

fn validate_provider_configs(config: &AppConfig) -> Result<()> {
    let mut seen = BTreeSet::new();
    for provider in &config.providers {
        if provider.name.trim().is_empty() {
            return Err(Error::config("Provider name cannot be empty"));
        }
        if !seen.insert(provider.name.as_str()) {
            return Err(Error::config(format!(
                "Duplicate provider name: {}",
                provider.name
            )));
        }
        let cost = provider.cost_per_call.unwrap_or(0.0);
        if !(cost.is_finite() && cost >= 0.0) {
            return Err(Error::config(format!(
                "Provider {} has an invalid cost_per_call: {cost}",
                provider.name
            )));
        }
        if provider.timeout_ms == Some(0) {
            return Err(Error::config(format!(
                "Provider {} timeout_ms cannot be 0",
                provider.name
            )));
        }
    }
    Ok(())
}
