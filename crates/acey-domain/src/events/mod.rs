//! Domain events published by the dispatch core

mod domain_events;

pub use domain_events::{DomainEvent, ProviderChange};
