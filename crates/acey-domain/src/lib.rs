//! # Acey Domain
//!
//! Core types of the Acey dispatch core: providers and their capabilities,
//! skill requests, execution outcomes, recovery attempts, scheduler cycles and
//! alerts, plus the ports the application layer depends on.
//!
//! This crate holds no runtime state and performs no I/O.

pub mod constants;
pub mod error;
pub mod events;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use events::{DomainEvent, ProviderChange};
pub use value_objects::*;
