//! Timing instrumentation helpers

use std::time::{Duration, Instant};

/// Elapsed-time tracker for logged operations
///
/// ```ignore
/// let timer = TimedOperation::start();
/// let context = init_app(config).await?;
/// info!(elapsed_ms = timer.elapsed_ms(), "system assembled");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    /// Start timing now
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time in whole milliseconds, saturating
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time left before `deadline`, `None` once it has passed
    pub fn remaining(&self, deadline: Duration) -> Option<Duration> {
        deadline.checked_sub(self.start.elapsed())
    }
}
