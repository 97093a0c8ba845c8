//! # Acey
//!
//! Dispatch-and-resilience core for autonomous skill execution: picks a
//! provider for each request, runs it under concurrency and timeout limits,
//! recovers from failures, and drives periodic work with an emergency brake.
//!
//! ## Example
//!
//! ```ignore
//! use acey::infrastructure::{ConfigLoader, init_app};
//! use acey::domain::SkillRequest;
//!
//! let context = init_app(ConfigLoader::new().load()?).await?;
//! let outcome = context
//!     .control()
//!     .submit_request(SkillRequest::new("summarize", serde_json::json!({"text": "..."})))
//!     .await;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - value objects, typed failures, events and ports
//! - `application` - registry, selector, gateway, recovery chain, scheduler
//! - `infrastructure` - configuration, logging, event bus, bootstrap
//! - `providers` - Ollama, OpenAI-compatible and Echo backends

/// Domain layer - value objects, errors, events and ports
pub mod domain {
    pub use acey_domain::*;
}

/// Application layer - dispatch, recovery and scheduling services
pub mod application {
    pub use acey_application::*;
}

/// Infrastructure layer - configuration, logging and bootstrap
pub mod infrastructure {
    pub use acey_infrastructure::*;
}

/// Backend implementations
pub mod providers {
    pub use acey_providers::*;
}

/// Command line entry point
pub mod cli;

pub use application::{ControlCenter, SystemStatus};
pub use cli::{Cli, run};
pub use domain::{DispatchFailure, DispatchResult, Outcome, Provider, SkillRequest};
pub use infrastructure::{AppConfig, AppContext, ConfigLoader, init_app};
