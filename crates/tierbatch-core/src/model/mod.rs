//! Cost/quality model: per-tier setup and marginal costs, quality floors,
//! and the accuracy matrix for downgrades.
//!
//! The model is plain data owned by the caller and passed by reference into
//! both schedulers, so several runs with different models can coexist.

mod error;
mod tier;

use serde::{Deserialize, Serialize};

pub use error::ModelError;
pub use tier::{Tier, TierSet};

const N: usize = Tier::COUNT;

/// Static cost and quality tables for the four tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// One-time cost paid the first time a tier is activated.
    pub fixed_setup_cost: [f64; N],
    /// Cost per item assigned to a tier.
    pub marginal_cost: [f64; N],
    /// Quality floor per original tier; compression below it is disallowed.
    pub min_acceptable_accuracy: [f64; N],
    /// `accuracy[original][target]`; only meaningful for `target <= original`.
    pub accuracy: [[f64; N]; N],
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            fixed_setup_cost: [2.25, 3.5, 3.5, 1.8],
            marginal_cost: [0.75, 1.0, 1.7, 5.3],
            min_acceptable_accuracy: [0.40, 0.60, 0.70, 0.85],
            accuracy: [
                [0.54, 0.71, 0.77, 0.78],
                [0.67, 0.75, 0.82, 0.85],
                [0.65, 0.72, 0.84, 0.86],
                [0.69, 0.77, 0.86, 0.87],
            ],
        }
    }
}

impl CostModel {
    pub fn fixed_setup_cost(&self, tier: Tier) -> f64 {
        self.fixed_setup_cost[tier.index()]
    }

    pub fn marginal_cost(&self, tier: Tier) -> f64 {
        self.marginal_cost[tier.index()]
    }

    pub fn min_acceptable_accuracy(&self, tier: Tier) -> f64 {
        self.min_acceptable_accuracy[tier.index()]
    }

    /// Expected accuracy of a job native to `original` processed at `target`.
    pub fn accuracy(&self, original: Tier, target: Tier) -> f64 {
        self.accuracy[original.index()][target.index()]
    }

    /// Cost of processing `items` jobs at `tier`, including the setup cost
    /// when `charge_setup` is set.
    pub fn batch_cost(&self, tier: Tier, items: usize, charge_setup: bool) -> f64 {
        let marginal = self.marginal_cost(tier) * items as f64;
        if charge_setup {
            marginal + self.fixed_setup_cost(tier)
        } else {
            marginal
        }
    }

    /// Smallest tier strictly below `original` whose accuracy still meets the
    /// floor of `original`. `None` when no downgrade is allowed.
    pub fn max_compression_target(&self, original: Tier) -> Option<Tier> {
        let floor = self.min_acceptable_accuracy(original);
        original
            .up_to()
            .take_while(|t| *t < original)
            .find(|t| self.accuracy(original, *t) >= floor)
    }

    /// Sum of setup costs for every tier up to and including `cap`.
    pub fn setup_cost_through(&self, cap: Tier) -> f64 {
        cap.up_to().map(|t| self.fixed_setup_cost(t)).sum()
    }

    /// Check that every cost is finite and non-negative and every accuracy
    /// value lies in `[0, 1]`.
    pub fn validate(&self) -> Result<(), ModelError> {
        for tier in Tier::ALL {
            let value = self.fixed_setup_cost(tier);
            if !is_cost(value) {
                return Err(ModelError::FixedSetupCost { tier, value });
            }
            let value = self.marginal_cost(tier);
            if !is_cost(value) {
                return Err(ModelError::MarginalCost { tier, value });
            }
            let value = self.min_acceptable_accuracy(tier);
            if !is_unit(value) {
                return Err(ModelError::AccuracyFloor { tier, value });
            }
            for target in Tier::ALL {
                let value = self.accuracy(tier, target);
                if !is_unit(value) {
                    return Err(ModelError::Accuracy {
                        original: tier,
                        target,
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}

fn is_cost(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

fn is_unit(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}
