//! Application-level ports
//!
//! Domain ports (backends, cycle runners, event bus) live in
//! `acey_domain::ports`; these are the interfaces the application layer
//! exposes to its own consumers.

pub mod services;

pub use services::SkillDispatcher;
