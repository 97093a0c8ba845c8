//! Ports (interfaces) consumed by the application layer
//!
//! | Port | Implemented by |
//! |------|----------------|
//! | [`BackendExecutor`] | `acey_providers::BackendDirectory` |
//! | [`SkillBackend`] | Ollama, OpenAI-compatible and Echo backends |
//! | [`CycleRunner`] | `acey_application::BatchCycleRunner`, test doubles |
//! | [`EventBusProvider`] | `acey_infrastructure::events` |

mod backend;
mod cycle;
mod events;

pub use backend::{BackendExecutor, BackendFailure, BackendResponse, SkillBackend};
pub use cycle::CycleRunner;
pub use events::{DomainEventStream, EventBusProvider, SharedEventBus};
