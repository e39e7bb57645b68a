//! Round-based compression scheduler.
//!
//! Admits pending jobs round by round against a single global deadline.
//! Crucial jobs are targeted at their native tier and ordinary jobs at the
//! cheapest tier. When a round's projected cost would overrun the deadline,
//! batches are downgraded to the smallest tier that still meets their quality
//! floor before the triggering job is given up on. A round that admits
//! nothing ends the run and marks every remaining job missed.

mod outcome;
mod plan;
mod run;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::model::CostModel;

pub use outcome::{CommittedBatch, CommittedRound, MissedJob, ScheduleOutcome, ScheduledJob};

/// When a tier's fixed setup cost is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SetupCostPolicy {
    /// Once per run, the first time the tier is used.
    #[default]
    PerRun,
    /// In every round that uses the tier.
    PerRound,
}

/// Round-based admission/compression scheduler over a borrowed cost model.
#[derive(Debug, Clone, Copy)]
pub struct CompressionScheduler<'m> {
    model: &'m CostModel,
    setup_policy: SetupCostPolicy,
}

impl<'m> CompressionScheduler<'m> {
    pub fn new(model: &'m CostModel) -> Self {
        Self {
            model,
            setup_policy: SetupCostPolicy::default(),
        }
    }

    pub fn with_setup_policy(mut self, policy: SetupCostPolicy) -> Self {
        self.setup_policy = policy;
        self
    }

    /// Schedule every job in `catalog`, overwriting any earlier result.
    ///
    /// On return each job is either Scheduled (with tier and round) or
    /// Missed.
    pub fn run(&self, catalog: &mut Catalog) -> ScheduleOutcome {
        let outcome = run::run_rounds(self.model, self.setup_policy, catalog);
        tracing::info!(
            total = outcome.total_jobs,
            scheduled = outcome.scheduled_count(),
            missed = outcome.missed_count(),
            rounds = outcome.rounds.len(),
            accumulated = outcome.accumulated_time,
            deadline = outcome.global_deadline,
            "compression schedule finished"
        );
        outcome
    }
}
