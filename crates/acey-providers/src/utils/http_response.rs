//! HTTP Response Utilities
//!
//! Turns HTTP statuses and transport errors into typed backend errors so the
//! recovery chain never has to parse message text.

use acey_domain::error::{Error, Result};
use acey_domain::value_objects::FailureKind;
use reqwest::{Response, StatusCode};
use std::time::Duration;

/// Failure kind for a non-success HTTP status
pub fn failure_kind_for_status(status: StatusCode) -> FailureKind {
    match status.as_u16() {
        401 => FailureKind::Authentication,
        403 => FailureKind::Authorization,
        404 => FailureKind::ModelNotFound,
        413 => FailureKind::PayloadTooLarge,
        429 => FailureKind::RateLimit,
        _ => FailureKind::Other,
    }
}

/// Response handling shared by the HTTP backends
pub struct HttpResponseUtils;

impl HttpResponseUtils {
    /// Check the status and parse the JSON body
    pub async fn check_and_parse(response: Response, backend: &str) -> Result<serde_json::Value> {
        let status = response.status();

        if !status.is_success() {
            let details = response
                .text()
                .await
                .unwrap_or_else(|_| "no response body".to_string());
            let kind = failure_kind_for_status(status);
            return Err(Error::backend(
                kind,
                format!("{backend} request failed ({}): {details}", status.as_u16()),
            ));
        }

        response.json().await.map_err(|e| {
            Error::backend(
                FailureKind::Other,
                format!("{backend} response parse failed: {e}"),
            )
        })
    }

    /// Classify a transport error
    pub fn request_error(backend: &str, error: &reqwest::Error, timeout: Duration) -> Error {
        if error.is_timeout() {
            Error::backend(
                FailureKind::Timeout,
                format!("{backend} request timed out after {timeout:?}"),
            )
        } else if error.is_connect() {
            Error::backend(
                FailureKind::ConnectionRefused,
                format!("{backend} connection refused: {error}"),
            )
        } else {
            Error::backend(
                FailureKind::Other,
                format!("{backend} HTTP request failed: {error}"),
            )
        }
    }
}
