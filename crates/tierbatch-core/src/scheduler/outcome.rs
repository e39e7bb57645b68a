//! Result of a round-based scheduling run.

use crate::catalog::Job;
use crate::model::{Tier, TierSet};

/// A job as committed into a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledJob {
    pub id: String,
    pub crucial: bool,
    pub native_tier: Tier,
}

impl From<&Job> for ScheduledJob {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id().to_string(),
            crucial: job.crucial(),
            native_tier: job.native_tier(),
        }
    }
}

/// Jobs processed together at one tier within a committed round.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedBatch {
    pub tier: Tier,
    pub jobs: Vec<ScheduledJob>,
}

impl CommittedBatch {
    pub fn crucial_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.crucial).count()
    }
}

/// One committed round: its cost and its batches in report order
/// (most crucial jobs first).
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedRound {
    /// 1-based round number.
    pub index: usize,
    /// Total cost added to the run clock by this round.
    pub cost: f64,
    /// Portion of `cost` that is tier setup cost.
    pub setup_cost: f64,
    pub batches: Vec<CommittedBatch>,
}

impl CommittedRound {
    pub fn job_count(&self) -> usize {
        self.batches.iter().map(|b| b.jobs.len()).sum()
    }
}

/// A job that could not be admitted within the deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct MissedJob {
    pub id: String,
    pub native_tier: Tier,
    pub deadline: f64,
    pub crucial: bool,
}

impl From<&Job> for MissedJob {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id().to_string(),
            native_tier: job.native_tier(),
            deadline: job.deadline(),
            crucial: job.crucial(),
        }
    }
}

/// Partition of a catalog into committed rounds and missed jobs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleOutcome {
    pub total_jobs: usize,
    pub global_deadline: f64,
    /// Sum of committed round costs; never exceeds `global_deadline`.
    pub accumulated_time: f64,
    /// Tiers used by at least one committed round.
    pub activated_tiers: TierSet,
    pub rounds: Vec<CommittedRound>,
    /// Missed jobs in catalog order.
    pub missed: Vec<MissedJob>,
}

impl ScheduleOutcome {
    pub fn scheduled_count(&self) -> usize {
        self.rounds.iter().map(CommittedRound::job_count).sum()
    }

    pub fn missed_count(&self) -> usize {
        self.missed.len()
    }

    pub fn missed_crucial(&self) -> usize {
        self.missed.iter().filter(|j| j.crucial).count()
    }

    pub fn missed_non_crucial(&self) -> usize {
        self.missed_count() - self.missed_crucial()
    }

    /// Total setup cost charged across all rounds.
    pub fn setup_cost_charged(&self) -> f64 {
        self.rounds.iter().map(|r| r.setup_cost).sum()
    }

    /// All committed batches, round by round, in report order.
    pub fn batches(&self) -> impl Iterator<Item = &CommittedBatch> {
        self.rounds.iter().flat_map(|r| r.batches.iter())
    }
}
