//! Cycle callback port

use crate::error::Result;
use crate::value_objects::CycleReport;
use async_trait::async_trait;

/// Work executed once per scheduler cycle
///
/// An `Err` is recorded as a scheduler fault and counts toward the
/// consecutive failure threshold; it never stops the scheduler loop.
#[async_trait]
pub trait CycleRunner: Send + Sync {
    /// Run cycle number `cycle_number`
    async fn run_cycle(&self, cycle_number: u64) -> Result<CycleReport>;
}
