//! The round loop: admit, compress, commit or give up.

use std::cmp::Reverse;

use crate::catalog::{Catalog, Job};
use crate::model::{CostModel, Tier, TierSet};

use super::outcome::{CommittedBatch, CommittedRound, MissedJob, ScheduleOutcome, ScheduledJob};
use super::plan::RoundPlan;
use super::SetupCostPolicy;

/// Process-wide state for one scheduling invocation.
struct ScheduleRun {
    accumulated_time: f64,
    activated: TierSet,
    global_deadline: f64,
    rounds: Vec<CommittedRound>,
}

impl ScheduleRun {
    fn new(global_deadline: f64) -> Self {
        Self {
            accumulated_time: 0.0,
            activated: TierSet::new(),
            global_deadline,
            rounds: Vec::new(),
        }
    }

    fn fits(&self, projected_cost: f64) -> bool {
        self.accumulated_time + projected_cost <= self.global_deadline
    }

    /// Tiers whose setup cost is already paid for the coming round.
    fn charged(&self, policy: SetupCostPolicy) -> TierSet {
        match policy {
            SetupCostPolicy::PerRun => self.activated,
            SetupCostPolicy::PerRound => TierSet::new(),
        }
    }

    fn commit(&mut self, model: &CostModel, plan: RoundPlan, charged: TierSet, catalog: &mut Catalog) {
        let index = self.rounds.len() + 1;
        let cost = plan.projected_cost(model, charged);
        let setup_cost = plan.setup_cost(model, charged);

        let mut batches: Vec<CommittedBatch> = Tier::ALL
            .into_iter()
            .filter(|t| !plan.batch(*t).is_empty())
            .map(|tier| {
                let jobs = plan
                    .batch(tier)
                    .iter()
                    .map(|entry| {
                        let job = catalog.job_mut(entry.job);
                        job.mark_scheduled(tier, Some(index));
                        ScheduledJob::from(&*job)
                    })
                    .collect();
                CommittedBatch { tier, jobs }
            })
            .collect();
        // Stable: equal crucial counts keep ascending tier order.
        batches.sort_by_key(|b| Reverse(b.crucial_count()));

        self.activated = self.activated.union(plan.active_tiers());
        self.accumulated_time += cost;
        tracing::debug!(
            round = index,
            jobs = plan.len(),
            cost,
            accumulated = self.accumulated_time,
            "committed round"
        );
        self.rounds.push(CommittedRound {
            index,
            cost,
            setup_cost,
            batches,
        });
    }
}

/// Crucial jobs keep their native tier; ordinary jobs go to the cheapest tier.
fn admission_target(job: &Job) -> Tier {
    if job.crucial() {
        job.native_tier()
    } else {
        Tier::SMALLEST
    }
}

/// Catalog indices, crucial first, then by ascending deadline. Stable on
/// catalog order.
fn admission_order(catalog: &Catalog) -> Vec<usize> {
    let jobs = catalog.jobs();
    let mut order: Vec<usize> = (0..jobs.len()).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (&jobs[a], &jobs[b]);
        b.crucial()
            .cmp(&a.crucial())
            .then(a.deadline().total_cmp(&b.deadline()))
    });
    order
}

pub(super) fn run_rounds(
    model: &CostModel,
    policy: SetupCostPolicy,
    catalog: &mut Catalog,
) -> ScheduleOutcome {
    catalog.reset();
    let mut run = ScheduleRun::new(catalog.global_deadline());
    let mut pending = admission_order(catalog);
    let mut missed: Vec<usize> = Vec::new();

    while !pending.is_empty() {
        let charged = run.charged(policy);
        let mut plan = RoundPlan::default();
        let mut admitted = 0usize;
        let mut rejected = false;

        for &idx in &pending {
            let target = admission_target(&catalog.jobs()[idx]);
            plan.push(idx, target);
            let fits = |cost: f64| run.fits(cost);
            if !fits(plan.projected_cost(model, charged)) && !plan.compress(model, charged, fits) {
                // Compression moves made for this job stay in the round.
                plan.remove(idx);
                rejected = true;
                break;
            }
            admitted += 1;
        }

        if admitted == 0 {
            tracing::debug!(
                remaining = pending.len(),
                "nothing fits in a new round; remaining jobs missed"
            );
            missed.append(&mut pending);
            break;
        }

        // Admission follows `pending` order, so the admitted jobs are its prefix.
        let mut rest = pending.split_off(admitted);
        if rejected && !rest.is_empty() {
            let idx = rest.remove(0);
            tracing::debug!(job = catalog.jobs()[idx].id(), "job missed after maximal compression");
            missed.push(idx);
        }
        run.commit(model, plan, charged, catalog);
        pending = rest;
    }

    missed.sort_unstable();
    let missed = missed
        .into_iter()
        .map(|idx| {
            let job = catalog.job_mut(idx);
            job.mark_missed();
            MissedJob::from(&*job)
        })
        .collect();

    ScheduleOutcome {
        total_jobs: catalog.len(),
        global_deadline: run.global_deadline,
        accumulated_time: run.accumulated_time,
        activated_tiers: run.activated,
        rounds: run.rounds,
        missed,
    }
}
