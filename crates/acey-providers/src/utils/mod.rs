//! Shared helpers for backend implementations

pub mod http_response;
pub mod prompt;

pub use http_response::{HttpResponseUtils, failure_kind_for_status};
pub use prompt::{confidence_for_finish_reason, render_prompt};
