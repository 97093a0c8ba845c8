//! # Acey Application
//!
//! Runtime services of the dispatch core:
//!
//! - [`ProviderRegistry`] and [`ProviderSelector`] decide *who* serves a request
//! - [`ExecutionGateway`] runs it under concurrency and timeout limits
//! - [`RecoveryChain`] turns failures into retries, fallbacks, cached or
//!   degraded results
//! - [`CycleScheduler`] drives periodic autonomous work with emergency
//!   shutdown after repeated failures
//!
//! [`DispatchService`] wires the first three together behind
//! `submit_request`; [`ControlCenter`] is the operator-facing control surface.

pub mod domain_services;
pub mod ports;
pub mod use_cases;

pub use domain_services::alerts::AlertLog;
pub use domain_services::emergency::EmergencyState;
pub use domain_services::execution_stats::{ExecutionStatsStore, ProviderStats};
pub use domain_services::gateway::{ExecutionGateway, GatewaySettings};
pub use domain_services::outcome_cache::OutcomeCache;
pub use domain_services::recovery::{
    RecoveryChain, RecoveryContext, RecoveryReport, RecoverySettings, RecoveryStats,
    RecoveryStrategy,
};
pub use domain_services::registry::ProviderRegistry;
pub use domain_services::scheduler::{
    CycleScheduler, SchedulerSettings, SchedulerState, SchedulerStatus,
};
pub use domain_services::selector::ProviderSelector;
pub use ports::services::SkillDispatcher;
pub use use_cases::batch_runner::{BatchCycleRunner, JobSpec};
pub use use_cases::control_center::{ControlCenter, SystemStatus};
pub use use_cases::dispatch_service::{DispatchService, ExecutionStats};
