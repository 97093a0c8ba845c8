//! Backend implementations
//!
//! Each backend implements [`SkillBackend`] for one model endpoint.
//! [`create_backend`] builds one from its configuration section.

mod echo;
mod ollama;
mod openai;

pub use echo::EchoBackend;
pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

use crate::constants::{
    DEFAULT_HTTP_TIMEOUT_MS, OLLAMA_DEFAULT_MODEL, OLLAMA_DEFAULT_URL, OPENAI_DEFAULT_API_KEY_ENV,
    OPENAI_DEFAULT_MODEL, OPENAI_DEFAULT_URL,
};
use acey_domain::error::{Error, Result};
use acey_domain::ports::SkillBackend;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Backend implementation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// Returns the payload, no model involved
    #[default]
    Echo,
    /// Local Ollama server
    Ollama,
    /// OpenAI-compatible chat completions API
    #[serde(rename = "openai")]
    OpenAi,
}

/// Backend section of a provider configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Implementation to use
    #[serde(rename = "type")]
    pub backend_type: BackendType,
    /// Server URL; each backend has its own default
    pub base_url: Option<String>,
    /// Model name
    pub model: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
    /// HTTP client timeout
    pub timeout_ms: Option<u64>,
}

impl BackendConfig {
    /// Echo backend configuration
    pub fn echo() -> Self {
        Self::default()
    }

    /// Ollama backend configuration
    pub fn ollama(model: impl Into<String>) -> Self {
        Self {
            backend_type: BackendType::Ollama,
            model: Some(model.into()),
            ..Self::default()
        }
    }

    /// OpenAI-compatible backend configuration
    pub fn openai(model: impl Into<String>, api_key_env: impl Into<String>) -> Self {
        Self {
            backend_type: BackendType::OpenAi,
            model: Some(model.into()),
            api_key_env: Some(api_key_env.into()),
            ..Self::default()
        }
    }

    /// Set the server URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_HTTP_TIMEOUT_MS))
    }

    fn effective_url(&self, default_url: &str) -> String {
        self.base_url
            .as_deref()
            .map_or_else(|| default_url.to_string(), |url| url.trim().to_string())
    }
}

/// Build the backend described by `config`
///
/// # Errors
///
/// `Configuration` when the HTTP client cannot be built or the API key
/// variable of an OpenAI-compatible backend is unset.
pub fn create_backend(config: &BackendConfig) -> Result<Arc<dyn SkillBackend>> {
    match config.backend_type {
        BackendType::Echo => Ok(Arc::new(EchoBackend::new())),
        BackendType::Ollama => {
            let timeout = config.timeout();
            let backend = OllamaBackend::new(
                config.effective_url(OLLAMA_DEFAULT_URL),
                config
                    .model
                    .clone()
                    .unwrap_or_else(|| OLLAMA_DEFAULT_MODEL.to_string()),
                timeout,
                http_client(timeout)?,
            );
            Ok(Arc::new(backend))
        }
        BackendType::OpenAi => {
            let key_env = config
                .api_key_env
                .as_deref()
                .unwrap_or(OPENAI_DEFAULT_API_KEY_ENV);
            let api_key = std::env::var(key_env).map_err(|e| {
                Error::config_with_source(
                    format!("API key variable {key_env} is not set"),
                    e,
                )
            })?;
            let timeout = config.timeout();
            let backend = OpenAiBackend::new(
                api_key,
                config.effective_url(OPENAI_DEFAULT_URL),
                config
                    .model
                    .clone()
                    .unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_string()),
                timeout,
                http_client(timeout)?,
            );
            Ok(Arc::new(backend))
        }
    }
}

fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::config_with_source("Failed to build HTTP client", e))
}
