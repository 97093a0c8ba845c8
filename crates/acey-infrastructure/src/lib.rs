//! # Acey Infrastructure
//!
//! Cross-cutting technical concerns and the composition root.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Figment-based [`AppConfig`] loading and validation |
//! | [`logging`] | `tracing-subscriber` initialization |
//! | [`events`] | Tokio broadcast and null event buses |
//! | [`error_ext`] | Context helpers converting foreign errors |
//! | [`bootstrap`] | Builds the whole system from an [`AppConfig`] |

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod events;
pub mod logging;
pub mod utils;

pub use bootstrap::{AppContext, init_app};
pub use config::{AppConfig, ConfigLoader};
