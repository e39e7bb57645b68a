//! Task catalog: the in-memory set of jobs handed to the schedulers.
//!
//! Jobs are immutable apart from the scheduler-owned state and assigned tier.
//! Identity is the string id, unique within a catalog.

mod error;
mod load;

use std::collections::HashSet;

use crate::model::Tier;

pub use error::CatalogError;
pub use load::{load_from_path, parse_rows};

/// Scheduling state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Scheduled,
    Missed,
}

/// One inference request.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    id: String,
    native_tier: Tier,
    deadline: f64,
    crucial: bool,
    state: JobState,
    assigned_tier: Option<Tier>,
    round: Option<usize>,
}

impl Job {
    pub fn new(id: impl Into<String>, native_tier: Tier, deadline: f64, crucial: bool) -> Self {
        Self {
            id: id.into(),
            native_tier,
            deadline,
            crucial,
            state: JobState::Pending,
            assigned_tier: None,
            round: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn native_tier(&self) -> Tier {
        self.native_tier
    }

    pub fn deadline(&self) -> f64 {
        self.deadline
    }

    pub fn crucial(&self) -> bool {
        self.crucial
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Tier the job was processed at; set once scheduled.
    pub fn assigned_tier(&self) -> Option<Tier> {
        self.assigned_tier
    }

    /// Round in which the job was committed (1-based), for the round scheduler.
    pub fn round(&self) -> Option<usize> {
        self.round
    }

    pub(crate) fn mark_scheduled(&mut self, tier: Tier, round: Option<usize>) {
        self.state = JobState::Scheduled;
        self.assigned_tier = Some(tier);
        self.round = round;
    }

    pub(crate) fn mark_missed(&mut self) {
        self.state = JobState::Missed;
        self.assigned_tier = None;
        self.round = None;
    }

    fn reset(&mut self) {
        self.state = JobState::Pending;
        self.assigned_tier = None;
        self.round = None;
    }
}

/// Validated, non-empty collection of jobs with unique ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    jobs: Vec<Job>,
    global_deadline: f64,
}

impl Catalog {
    pub fn new(jobs: Vec<Job>) -> Result<Self, CatalogError> {
        if jobs.is_empty() {
            return Err(CatalogError::Empty);
        }
        {
            let mut seen = HashSet::with_capacity(jobs.len());
            for job in &jobs {
                if !job.deadline.is_finite() {
                    return Err(CatalogError::BadDeadline { id: job.id.clone() });
                }
                if !seen.insert(job.id.as_str()) {
                    return Err(CatalogError::DuplicateId(job.id.clone()));
                }
            }
        }
        let global_deadline = jobs
            .iter()
            .map(|j| j.deadline)
            .fold(f64::INFINITY, f64::min);
        Ok(Self {
            jobs,
            global_deadline,
        })
    }

    /// Minimum deadline across all jobs; the single hard constraint of a run.
    pub fn global_deadline(&self) -> f64 {
        self.global_deadline
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn count_in(&self, state: JobState) -> usize {
        self.jobs.iter().filter(|j| j.state == state).count()
    }

    pub(crate) fn job_mut(&mut self, index: usize) -> &mut Job {
        &mut self.jobs[index]
    }

    /// Put every job back to Pending, clearing prior scheduling results.
    pub(crate) fn reset(&mut self) {
        self.jobs.iter_mut().for_each(Job::reset);
    }
}
