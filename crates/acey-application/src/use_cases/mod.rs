//! Use cases
//!
//! Orchestration on top of the domain services: request dispatch, the batch
//! cycle runner and the operator control surface.

pub mod batch_runner;
pub mod control_center;
pub mod dispatch_service;

pub use batch_runner::{BatchCycleRunner, JobSpec};
pub use control_center::{ControlCenter, SystemStatus};
pub use dispatch_service::{DispatchService, ExecutionStats};
