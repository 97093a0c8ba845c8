//! OpenAI-compatible Backend
//!
//! Runs skills through a `/chat/completions` endpoint. Works against OpenAI
//! and any server speaking the same protocol.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use acey_domain::error::{Error, Result};
use acey_domain::ports::{BackendResponse, SkillBackend};
use acey_domain::value_objects::{FailureKind, SkillRequest};

use crate::constants::CONTENT_TYPE_JSON;
use crate::utils::{HttpResponseUtils, confidence_for_finish_reason, render_prompt};

/// Chat completions backend
pub struct OpenAiBackend {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    http_client: Client,
}

impl OpenAiBackend {
    /// Create a new OpenAI-compatible backend
    ///
    /// # Arguments
    /// * `api_key` - Bearer token sent with every request
    /// * `base_url` - API root, e.g. `https://api.openai.com/v1`
    /// * `model` - Chat model name
    /// * `timeout` - Request timeout
    /// * `http_client` - Shared reqwest client
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        timeout: Duration,
        http_client: Client,
    ) -> Self {
        Self {
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout,
            http_client,
        }
    }

    /// Model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// API root
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn parse_completion(data: &serde_json::Value) -> Result<(String, f64)> {
        let choice = &data["choices"][0];
        let text = choice["message"]["content"].as_str().ok_or_else(|| {
            Error::backend(
                FailureKind::Other,
                "Invalid chat completion: missing message content",
            )
        })?;
        let reason = choice["finish_reason"].as_str();
        Ok((text.to_string(), confidence_for_finish_reason(reason)))
    }
}

#[async_trait]
impl SkillBackend for OpenAiBackend {
    fn backend_name(&self) -> &str {
        "openai"
    }

    async fn invoke(&self, request: &SkillRequest) -> Result<BackendResponse> {
        let started = Instant::now();
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": format!("You are executing the skill `{}`.", request.skill_name)
                },
                { "role": "user", "content": render_prompt(request) }
            ]
        });

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| HttpResponseUtils::request_error("OpenAI", &e, self.timeout))?;

        let data = HttpResponseUtils::check_and_parse(response, "OpenAI").await?;
        let (text, confidence) = Self::parse_completion(&data)?;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(model = %self.model, duration_ms, "chat completion received");

        Ok(BackendResponse::ok(
            serde_json::json!({ "text": text, "model": self.model }),
            confidence,
            duration_ms,
        ))
    }
}
