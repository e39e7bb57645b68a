//! Tentative per-tier batch plan for one round, and batch compression.

use crate::model::{CostModel, Tier, TierSet};

/// A job placed in a round's plan. `origin` is the tier it was admitted at,
/// which fixes how far compression may move it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Entry {
    pub job: usize,
    pub origin: Tier,
}

/// Four batches, one per tier, built up while admitting jobs into a round.
#[derive(Debug, Clone, Default)]
pub(super) struct RoundPlan {
    batches: [Vec<Entry>; Tier::COUNT],
}

impl RoundPlan {
    pub fn push(&mut self, job: usize, tier: Tier) {
        self.batches[tier.index()].push(Entry { job, origin: tier });
    }

    /// Drop `job` from whichever batch holds it, leaving every other entry
    /// where compression put it. Returns whether the job was found.
    pub fn remove(&mut self, job: usize) -> bool {
        for batch in &mut self.batches {
            if let Some(pos) = batch.iter().position(|e| e.job == job) {
                batch.remove(pos);
                return true;
            }
        }
        false
    }

    pub fn batch(&self, tier: Tier) -> &[Entry] {
        &self.batches[tier.index()]
    }

    pub fn len(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    /// Tiers with at least one job.
    pub fn active_tiers(&self) -> TierSet {
        Tier::ALL
            .into_iter()
            .filter(|t| !self.batch(*t).is_empty())
            .collect()
    }

    /// Cost of the plan: marginal cost per item for every non-empty batch,
    /// plus the setup cost of tiers not in `charged`.
    pub fn projected_cost(&self, model: &CostModel, charged: TierSet) -> f64 {
        self.active_tiers()
            .iter()
            .map(|t| model.batch_cost(t, self.batch(t).len(), !charged.contains(t)))
            .sum()
    }

    /// Setup cost this plan adds on top of the `charged` tiers.
    pub fn setup_cost(&self, model: &CostModel, charged: TierSet) -> f64 {
        self.active_tiers()
            .iter()
            .filter(|t| !charged.contains(*t))
            .map(|t| model.fixed_setup_cost(t))
            .sum()
    }

    /// Downgrade batches, largest tier first, each to the smallest tier that
    /// still meets its quality floor, until `fits` accepts the projected cost
    /// or no batch can move any further. Returns whether the plan fits.
    pub fn compress(
        &mut self,
        model: &CostModel,
        charged: TierSet,
        fits: impl Fn(f64) -> bool,
    ) -> bool {
        loop {
            let mut moved = false;
            for tier in Tier::ALL.into_iter().rev() {
                if self.compress_batch(model, tier) {
                    moved = true;
                    if fits(self.projected_cost(model, charged)) {
                        return true;
                    }
                }
            }
            if !moved {
                return fits(self.projected_cost(model, charged));
            }
        }
    }

    /// Move every entry of `tier`'s batch that may go lower into its
    /// maximum-compression target, merging with what is already there.
    fn compress_batch(&mut self, model: &CostModel, tier: Tier) -> bool {
        let batch = std::mem::take(&mut self.batches[tier.index()]);
        let mut moved = 0usize;
        for entry in batch {
            match model.max_compression_target(entry.origin) {
                Some(target) if target < tier => {
                    self.batches[target.index()].push(entry);
                    moved += 1;
                }
                _ => self.batches[tier.index()].push(entry),
            }
        }
        if moved > 0 {
            tracing::debug!(from = %tier, jobs = moved, "compressed batch");
        }
        moved > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(i: usize) -> Tier {
        Tier::new(i).unwrap()
    }

    #[test]
    fn projected_cost_charges_setup_once_per_tier() {
        let m = CostModel::default();
        let mut plan = RoundPlan::default();
        plan.push(0, tier(1));
        plan.push(1, tier(1));
        plan.push(2, tier(0));
        // 2 * 1.0 + 3.5 + 0.75 + 2.25
        assert!((plan.projected_cost(&m, TierSet::new()) - 8.5).abs() < 1e-9);

        let charged: TierSet = [tier(1)].into_iter().collect();
        assert!((plan.projected_cost(&m, charged) - 5.0).abs() < 1e-9);
        assert!((plan.setup_cost(&m, charged) - 2.25).abs() < 1e-9);
    }

    #[test]
    fn compress_merges_into_target_batch() {
        let m = CostModel::default();
        let mut plan = RoundPlan::default();
        plan.push(0, tier(3));
        plan.push(1, tier(2));
        plan.push(2, tier(1));
        assert!(!plan.compress(&m, TierSet::new(), |_| false));
        // 3 -> 2, 2 -> 1, 1 -> 0; nothing moves twice.
        assert!(plan.batch(tier(3)).is_empty());
        assert_eq!(plan.batch(tier(2)).len(), 1);
        assert_eq!(plan.batch(tier(1)).len(), 1);
        assert_eq!(plan.batch(tier(0)).len(), 1);
        assert_eq!(plan.batch(tier(2))[0].origin, tier(3));
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn compress_stops_once_plan_fits() {
        let m = CostModel::default();
        let mut plan = RoundPlan::default();
        plan.push(0, tier(3));
        plan.push(1, tier(1));
        // 3 -> 2 alone gives 1.7 + 3.5 + 1.0 + 3.5 = 9.7
        let fits = plan.compress(&m, TierSet::new(), |cost| cost <= 9.8);
        assert!(fits);
        assert_eq!(plan.batch(tier(2)).len(), 1);
        assert_eq!(plan.batch(tier(1)).len(), 1);
        assert!(plan.batch(tier(0)).is_empty());
    }

    #[test]
    fn remove_keeps_compressed_entries() {
        let m = CostModel::default();
        let mut plan = RoundPlan::default();
        plan.push(0, tier(3));
        plan.push(1, tier(1));
        assert!(!plan.compress(&m, TierSet::new(), |_| false));
        // job 1 was moved to tier 0 before being dropped.
        assert!(plan.remove(1));
        assert!(!plan.remove(1));
        assert_eq!(plan.len(), 1);
        assert!(plan.batch(tier(0)).is_empty());
        assert_eq!(plan.batch(tier(2))[0].job, 0);
    }

    #[test]
    fn compress_respects_floor() {
        let mut m = CostModel::default();
        m.min_acceptable_accuracy[3] = 0.95;
        let mut plan = RoundPlan::default();
        plan.push(0, tier(3));
        assert!(!plan.compress(&m, TierSet::new(), |_| false));
        assert_eq!(plan.batch(tier(3)).len(), 1);
    }
}
