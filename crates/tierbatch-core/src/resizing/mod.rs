//! Budgeted resizing optimizer.
//!
//! For one time budget, picks a global tier cap and a per-job tier that
//! maximises priority-weighted accuracy. Every cap is tried: each charges the
//! setup cost of all tiers up to it, starts every job at the smallest tier,
//! then applies upgrade edges greedily by quality gained per unit cost. The
//! result is all-or-nothing: if no cap can even afford the baseline, the
//! whole catalog is infeasible.

mod edge;

use crate::catalog::{Catalog, Job};
use crate::model::{CostModel, Tier};

use edge::upgrade_edges;

/// Utility weight of a job: crucial jobs count fully, ordinary jobs half.
pub fn weight(crucial: bool) -> f64 {
    if crucial {
        1.0
    } else {
        0.5
    }
}

/// What happened when one cap was tried.
#[derive(Debug, Clone, PartialEq)]
pub struct CapEvaluation {
    pub cap: Tier,
    /// Budget left after paying setup for every tier up to `cap`.
    pub effective_budget: f64,
    /// Cost of running every job at the smallest tier.
    pub baseline_cost: f64,
    /// Total utility, or `None` when the baseline does not fit.
    pub utility: Option<f64>,
}

/// Tier chosen for one job.
#[derive(Debug, Clone, PartialEq)]
pub struct TierAssignment {
    pub id: String,
    pub crucial: bool,
    pub native_tier: Tier,
    pub tier: Tier,
}

/// Winning assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizingPlan {
    pub budget: f64,
    pub cap: Tier,
    pub utility: f64,
    /// Effective budget not spent by the winning cap.
    pub remaining_budget: f64,
    /// One entry per job, in catalog order.
    pub assignments: Vec<TierAssignment>,
    /// Every cap tried, in ascending order.
    pub evaluations: Vec<CapEvaluation>,
}

impl ResizingPlan {
    /// Assignments at `tier`, in catalog order.
    pub fn jobs_at(&self, tier: Tier) -> impl Iterator<Item = &TierAssignment> {
        self.assignments.iter().filter(move |a| a.tier == tier)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResizingOutcome {
    Assigned(ResizingPlan),
    /// No cap admits the baseline assignment; no job is assigned.
    Infeasible {
        budget: f64,
        evaluations: Vec<CapEvaluation>,
    },
}

impl ResizingOutcome {
    pub fn is_feasible(&self) -> bool {
        matches!(self, ResizingOutcome::Assigned(_))
    }

    pub fn budget(&self) -> f64 {
        match self {
            ResizingOutcome::Assigned(plan) => plan.budget,
            ResizingOutcome::Infeasible { budget, .. } => *budget,
        }
    }
}

/// Greedy result for one cap.
struct CapResult {
    evaluation: CapEvaluation,
    assignment: Option<(Vec<Tier>, f64)>,
}

/// Budget-constrained, quality-maximising tier assignment over a borrowed
/// cost model.
#[derive(Debug, Clone, Copy)]
pub struct ResizingOptimizer<'m> {
    model: &'m CostModel,
}

impl<'m> ResizingOptimizer<'m> {
    pub fn new(model: &'m CostModel) -> Self {
        Self { model }
    }

    /// Assign tiers to every job within `budget`, writing the result back to
    /// the catalog. On infeasibility every job is marked missed.
    pub fn optimize(&self, catalog: &mut Catalog, budget: f64) -> ResizingOutcome {
        catalog.reset();
        let mut evaluations = Vec::with_capacity(Tier::COUNT);
        let mut best: Option<(Tier, f64, Vec<Tier>, f64)> = None;

        for cap in Tier::ALL {
            let result = self.evaluate_cap(catalog.jobs(), cap, budget);
            tracing::debug!(
                cap = %cap,
                effective_budget = result.evaluation.effective_budget,
                baseline_cost = result.evaluation.baseline_cost,
                utility = ?result.evaluation.utility,
                "evaluated tier cap"
            );
            if let (Some(utility), Some((tiers, remaining))) =
                (result.evaluation.utility, result.assignment)
            {
                if best.as_ref().map_or(true, |b| utility > b.1) {
                    best = Some((cap, utility, tiers, remaining));
                }
            }
            evaluations.push(result.evaluation);
        }

        let Some((cap, utility, tiers, remaining_budget)) = best else {
            for idx in 0..catalog.len() {
                catalog.job_mut(idx).mark_missed();
            }
            tracing::info!(budget, jobs = catalog.len(), "no tier cap is feasible");
            return ResizingOutcome::Infeasible {
                budget,
                evaluations,
            };
        };

        let assignments = tiers
            .iter()
            .enumerate()
            .map(|(idx, &tier)| {
                let job = catalog.job_mut(idx);
                job.mark_scheduled(tier, None);
                TierAssignment {
                    id: job.id().to_string(),
                    crucial: job.crucial(),
                    native_tier: job.native_tier(),
                    tier,
                }
            })
            .collect();
        tracing::info!(budget, cap = %cap, utility, remaining_budget, "resizing plan chosen");
        ResizingOutcome::Assigned(ResizingPlan {
            budget,
            cap,
            utility,
            remaining_budget,
            assignments,
            evaluations,
        })
    }

    fn evaluate_cap(&self, jobs: &[Job], cap: Tier, budget: f64) -> CapResult {
        let model = self.model;
        let effective_budget = budget - model.setup_cost_through(cap);
        let baseline_cost = model.marginal_cost(Tier::SMALLEST) * jobs.len() as f64;
        let baseline_utility: f64 = jobs
            .iter()
            .map(|j| weight(j.crucial()) * model.accuracy(j.native_tier(), Tier::SMALLEST))
            .sum();

        if baseline_cost > effective_budget {
            return CapResult {
                evaluation: CapEvaluation {
                    cap,
                    effective_budget,
                    baseline_cost,
                    utility: None,
                },
                assignment: None,
            };
        }

        let mut tiers = vec![Tier::SMALLEST; jobs.len()];
        let mut remaining = effective_budget - baseline_cost;
        let mut utility = baseline_utility;
        for edge in upgrade_edges(model, jobs, cap) {
            if tiers[edge.job] == edge.from && remaining >= edge.delta_cost {
                tiers[edge.job] = edge.to;
                remaining -= edge.delta_cost;
                utility += edge.delta_quality;
            }
        }

        CapResult {
            evaluation: CapEvaluation {
                cap,
                effective_budget,
                baseline_cost,
                utility: Some(utility),
            },
            assignment: Some((tiers, remaining)),
        }
    }
}
