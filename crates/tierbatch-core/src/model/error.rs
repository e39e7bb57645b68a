//! Cost model validation errors.

use thiserror::Error;

use super::Tier;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("fixed setup cost for {tier} must be finite and non-negative, got {value}")]
    FixedSetupCost { tier: Tier, value: f64 },

    #[error("marginal cost for {tier} must be finite and non-negative, got {value}")]
    MarginalCost { tier: Tier, value: f64 },

    #[error("minimum acceptable accuracy for {tier} must lie in [0, 1], got {value}")]
    AccuracyFloor { tier: Tier, value: f64 },

    #[error("accuracy for {original} -> {target} must lie in [0, 1], got {value}")]
    Accuracy {
        original: Tier,
        target: Tier,
        value: f64,
    },
}
