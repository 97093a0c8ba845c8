//! Value objects shared by every layer

mod alert;
mod cycle;
mod dispatch;
mod failure;
mod outcome;
mod provider;
mod recovery;
mod request;

pub use alert::{Alert, AlertSeverity};
pub use cycle::{CycleHealth, CycleRecord, CycleReport};
pub use dispatch::{DispatchFailure, DispatchFailureKind, DispatchResult};
pub use failure::FailureKind;
pub use outcome::{Outcome, quality_score};
pub use provider::{Provider, ProviderKind};
pub use recovery::RecoveryAttempt;
pub use request::{
    SkillRequest, TrustContext, TrustLevel, estimate_units, required_capabilities,
};
