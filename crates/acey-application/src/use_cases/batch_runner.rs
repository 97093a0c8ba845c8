//! Cycle runner that submits a fixed batch of jobs
//!
//! Each cycle submits every configured job concurrently. The cycle fails
//! only when a non-empty batch has no successful submission at all; partial
//! failures are reported as errors and anomalies.

use crate::ports::services::SkillDispatcher;
use acey_domain::error::{Error, Result};
use acey_domain::ports::CycleRunner;
use acey_domain::value_objects::{CycleReport, SkillRequest, TrustContext, TrustLevel};
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

fn default_permitted() -> bool {
    true
}

/// One job submitted on every cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Skill to request
    pub skill_name: String,
    /// Payload sent with the request
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
    /// Trust level of the submission
    #[serde(default)]
    pub trust_level: TrustLevel,
    /// Whether the trust policy permits the submission
    #[serde(default = "default_permitted")]
    pub permitted: bool,
}

impl JobSpec {
    /// A permitted job at the default trust level
    pub fn new(skill_name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            skill_name: skill_name.into(),
            payload,
            trust_level: TrustLevel::default(),
            permitted: true,
        }
    }

    fn to_request(&self) -> SkillRequest {
        let trust = if self.permitted {
            TrustContext::permitted(self.trust_level)
        } else {
            TrustContext::denied(self.trust_level)
        };
        SkillRequest::new(&self.skill_name, self.payload.clone()).with_trust(trust)
    }
}

/// [`CycleRunner`] submitting a fixed job list through a dispatcher
pub struct BatchCycleRunner {
    dispatcher: Arc<dyn SkillDispatcher>,
    jobs: Vec<JobSpec>,
}

impl BatchCycleRunner {
    /// Create a runner for `jobs`
    pub fn new(dispatcher: Arc<dyn SkillDispatcher>, jobs: Vec<JobSpec>) -> Self {
        Self { dispatcher, jobs }
    }

    /// Jobs submitted per cycle
    pub fn jobs(&self) -> &[JobSpec] {
        &self.jobs
    }
}

#[async_trait]
impl CycleRunner for BatchCycleRunner {
    async fn run_cycle(&self, cycle_number: u64) -> Result<CycleReport> {
        let submissions = self
            .jobs
            .iter()
            .map(|job| self.dispatcher.submit_request(job.to_request()));
        let results = join_all(submissions).await;

        let mut report = CycleReport {
            executed: results.len(),
            ..CycleReport::default()
        };
        for (job, result) in self.jobs.iter().zip(results) {
            match result {
                Ok(outcome) => {
                    report.succeeded += 1;
                    if outcome.recovered_by.is_some() {
                        report.anomalies += 1;
                    }
                }
                Err(failure) => report.errors.push(format!("{}: {failure}", job.skill_name)),
            }
        }
        debug!(
            cycle = cycle_number,
            executed = report.executed,
            succeeded = report.succeeded,
            "Batch finished"
        );

        if report.executed > 0 && report.succeeded == 0 {
            return Err(Error::scheduler(format!(
                "all {} job(s) failed; first error: {}",
                report.executed,
                report.errors.first().map_or("unknown", String::as_str)
            )));
        }
        Ok(report)
    }
}
