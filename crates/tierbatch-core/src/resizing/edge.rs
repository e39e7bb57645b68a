//! Upgrade edges: candidate moves of one job to a strictly higher tier.

use std::cmp::Ordering;

use crate::catalog::Job;
use crate::model::{CostModel, Tier};

use super::weight;

/// Moving job `job` from tier `from` to tier `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct UpgradeEdge {
    pub job: usize,
    pub from: Tier,
    pub to: Tier,
    pub delta_quality: f64,
    pub delta_cost: f64,
}

impl UpgradeEdge {
    pub fn ratio(&self) -> f64 {
        self.delta_quality / self.delta_cost
    }
}

/// Every edge `from < to <= min(cap, native)` with a positive cost increase,
/// sorted by quality gained per unit cost, best first. Ties fall back to job
/// id, then target tier, then source tier.
pub(super) fn upgrade_edges(model: &CostModel, jobs: &[Job], cap: Tier) -> Vec<UpgradeEdge> {
    let mut edges = Vec::new();
    for (idx, job) in jobs.iter().enumerate() {
        let native = job.native_tier();
        let top = cap.min(native);
        let w = weight(job.crucial());
        for from in top.up_to() {
            for to in top.up_to().filter(|t| *t > from) {
                let delta_cost = model.marginal_cost(to) - model.marginal_cost(from);
                if delta_cost <= 0.0 {
                    continue;
                }
                edges.push(UpgradeEdge {
                    job: idx,
                    from,
                    to,
                    delta_quality: w * (model.accuracy(native, to) - model.accuracy(native, from)),
                    delta_cost,
                });
            }
        }
    }
    edges.sort_by(|a, b| compare_edges(a, b, jobs));
    edges
}

fn compare_edges(a: &UpgradeEdge, b: &UpgradeEdge, jobs: &[Job]) -> Ordering {
    b.ratio()
        .total_cmp(&a.ratio())
        .then_with(|| jobs[a.job].id().cmp(jobs[b.job].id()))
        .then(a.to.cmp(&b.to))
        .then(a.from.cmp(&b.from))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(i: usize) -> Tier {
        Tier::new(i).unwrap()
    }

    #[test]
    fn edges_limited_by_cap_and_native_tier() {
        let m = CostModel::default();
        let jobs = vec![
            Job::new("x", tier(3), 10.0, true),
            Job::new("y", tier(1), 10.0, false),
        ];
        assert!(upgrade_edges(&m, &jobs, tier(0)).is_empty());

        let edges = upgrade_edges(&m, &jobs, tier(2));
        // x: 0->1, 0->2, 1->2; y: 0->1
        assert_eq!(edges.len(), 4);
        assert!(edges.iter().all(|e| e.to <= tier(2)));
        assert!(edges.iter().filter(|e| e.job == 1).all(|e| e.to == tier(1)));
    }

    #[test]
    fn edges_sorted_by_ratio_then_id() {
        let m = CostModel::default();
        let jobs = vec![
            Job::new("b", tier(1), 10.0, true),
            Job::new("a", tier(1), 10.0, true),
        ];
        let edges = upgrade_edges(&m, &jobs, tier(3));
        assert_eq!(edges.len(), 2);
        assert_eq!(jobs[edges[0].job].id(), "a");
        assert_eq!(jobs[edges[1].job].id(), "b");
    }

    #[test]
    fn ordinary_jobs_gain_half_quality() {
        let m = CostModel::default();
        let jobs = vec![
            Job::new("c", tier(1), 10.0, true),
            Job::new("o", tier(1), 10.0, false),
        ];
        let edges = upgrade_edges(&m, &jobs, tier(1));
        let crucial = edges.iter().find(|e| e.job == 0).unwrap();
        let ordinary = edges.iter().find(|e| e.job == 1).unwrap();
        assert!((crucial.delta_quality - 2.0 * ordinary.delta_quality).abs() < 1e-12);
        assert!((crucial.delta_cost - ordinary.delta_cost).abs() < 1e-12);
        assert!(crucial.ratio() > ordinary.ratio());
    }

    #[test]
    fn non_increasing_costs_produce_no_edges() {
        let mut m = CostModel::default();
        m.marginal_cost = [1.0; 4];
        let jobs = vec![Job::new("x", tier(3), 10.0, true)];
        assert!(upgrade_edges(&m, &jobs, tier(3)).is_empty());
    }
}
