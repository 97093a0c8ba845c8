//! Ollama Backend
//!
//! Runs skills on a local Ollama server through `/api/generate` with
//! streaming disabled.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use acey_domain::error::{Error, Result};
use acey_domain::ports::{BackendResponse, SkillBackend};
use acey_domain::value_objects::{FailureKind, SkillRequest};

use crate::constants::CONTENT_TYPE_JSON;
use crate::utils::{HttpResponseUtils, confidence_for_finish_reason, render_prompt};

/// Ollama generation backend
///
/// Receives its HTTP client via constructor injection.
///
/// ## Example
///
/// ```rust,no_run
/// use acey_providers::OllamaBackend;
/// use reqwest::Client;
/// use std::time::Duration;
///
/// let backend = OllamaBackend::new(
///     "http://localhost:11434".to_string(),
///     "llama3.2".to_string(),
///     Duration::from_secs(60),
///     Client::new(),
/// );
/// ```
pub struct OllamaBackend {
    base_url: String,
    model: String,
    timeout: Duration,
    http_client: Client,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    pub fn new(base_url: String, model: String, timeout: Duration, http_client: Client) -> Self {
        Self {
            base_url,
            model,
            timeout,
            http_client,
        }
    }

    /// Model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Server URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn parse_completion(data: &serde_json::Value) -> Result<(String, f64)> {
        let text = data["response"].as_str().ok_or_else(|| {
            Error::backend(
                FailureKind::Other,
                "Invalid Ollama response: missing response text",
            )
        })?;
        let reason = data["done_reason"].as_str();
        Ok((text.to_string(), confidence_for_finish_reason(reason)))
    }
}

#[async_trait]
impl SkillBackend for OllamaBackend {
    fn backend_name(&self) -> &str {
        "ollama"
    }

    async fn invoke(&self, request: &SkillRequest) -> Result<BackendResponse> {
        let started = Instant::now();
        let body = serde_json::json!({
            "model": self.model,
            "prompt": render_prompt(request),
            "stream": false
        });

        let response = self
            .http_client
            .post(format!(
                "{}/api/generate",
                self.base_url.trim_end_matches('/')
            ))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| HttpResponseUtils::request_error("Ollama", &e, self.timeout))?;

        let data = HttpResponseUtils::check_and_parse(response, "Ollama").await?;
        let (text, confidence) = Self::parse_completion(&data)?;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(model = %self.model, duration_ms, "Ollama completion received");

        Ok(BackendResponse::ok(
            serde_json::json!({ "text": text, "model": self.model }),
            confidence,
            duration_ms,
        ))
    }
}
