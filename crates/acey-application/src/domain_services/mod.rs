//! Domain services
//!
//! Stateful building blocks of the dispatch core. Each service owns its own
//! synchronization; they are shared through `Arc` and composed by the use
//! cases.

pub mod alerts;
pub mod emergency;
pub mod execution_stats;
pub mod gateway;
pub mod in_flight;
pub mod outcome_cache;
pub mod recovery;
pub mod registry;
pub mod scheduler;
pub mod selector;
