//! Provider Constants
//!
//! Constants specific to backend implementations. Dispatch rules live in
//! `acey_domain::constants`.

// ============================================================================
// HTTP CONSTANTS
// ============================================================================

/// JSON content type header value
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Client-side timeout for backend HTTP calls when none is configured
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 120_000;

// ============================================================================
// OLLAMA CONSTANTS
// ============================================================================

/// Default Ollama server URL
pub const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";

/// Default Ollama generation model
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3.2";

// ============================================================================
// OPENAI CONSTANTS
// ============================================================================

/// Default OpenAI-compatible API URL
pub const OPENAI_DEFAULT_URL: &str = "https://api.openai.com/v1";

/// Default chat model
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Environment variable holding the API key when none is configured
pub const OPENAI_DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

// ============================================================================
// CONFIDENCE CONSTANTS
// ============================================================================

/// Confidence of a completion that ended naturally
pub const CONFIDENCE_COMPLETE: f64 = 0.9;

/// Confidence of a completion cut off by the length limit
pub const CONFIDENCE_TRUNCATED: f64 = 0.6;

/// Confidence when the backend reports no finish reason
pub const CONFIDENCE_UNKNOWN: f64 = 0.5;

/// Confidence of the echo backend
pub const CONFIDENCE_ECHO: f64 = 1.0;
