//! Cycle history bounded by age and by count

use acey_domain::value_objects::CycleRecord;
use chrono::{TimeDelta, Utc};
use std::collections::VecDeque;

/// Cycle records younger than the retention window, at most `capacity` of
/// them, oldest first
#[derive(Debug)]
pub struct CycleHistory {
    records: VecDeque<CycleRecord>,
    retention: TimeDelta,
    capacity: usize,
}

impl CycleHistory {
    /// Keep up to `capacity` records for `retention_secs`
    pub fn new(retention_secs: u64, capacity: usize) -> Self {
        let retention = i64::try_from(retention_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        Self {
            records: VecDeque::new(),
            retention,
            capacity: capacity.max(1),
        }
    }

    /// Append a record, then drop expired records and the oldest beyond
    /// capacity
    pub fn push(&mut self, record: CycleRecord) {
        self.records.push_back(record);
        self.prune();
    }

    fn prune(&mut self) {
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
        let Some(cutoff) = Utc::now().checked_sub_signed(self.retention) else {
            return;
        };
        while self
            .records
            .front()
            .is_some_and(|oldest| oldest.ended_at < cutoff)
        {
            self.records.pop_front();
        }
    }

    /// The `limit` most recent records, oldest first
    pub fn recent(&self, limit: usize) -> Vec<CycleRecord> {
        let skip = self.records.len().saturating_sub(limit);
        self.records.iter().skip(skip).cloned().collect()
    }

    /// Records held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is held
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
