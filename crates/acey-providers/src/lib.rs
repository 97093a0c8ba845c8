//! # Acey Providers
//!
//! Concrete execution backends behind the dispatch core's backend ports.
//!
//! | Backend | Kind | Endpoint |
//! |---------|------|----------|
//! | [`OllamaBackend`] | local | `POST {base_url}/api/generate` |
//! | [`OpenAiBackend`] | remote | `POST {base_url}/chat/completions` |
//! | [`EchoBackend`] | local | none, returns the payload |
//!
//! [`BackendDirectory`] implements `BackendExecutor` by routing each
//! invocation to the backend registered under the selected provider's name.
//!
//! ## Usage
//!
//! ```ignore
//! use acey_providers::{BackendConfig, BackendDirectory, create_backend};
//!
//! let directory = BackendDirectory::new();
//! directory.register("echo", create_backend(&BackendConfig::default())?);
//! ```

pub use acey_domain::error::{Error, Result};
pub use acey_domain::ports::{BackendExecutor, SkillBackend};

/// Provider-specific constants
pub mod constants;

/// Shared utilities for backend implementations
pub mod utils;

/// Backend implementations and factory
pub mod backend;

/// Provider name to backend routing
pub mod directory;

pub use backend::{
    BackendConfig, BackendType, EchoBackend, OllamaBackend, OpenAiBackend, create_backend,
};
pub use directory::BackendDirectory;
