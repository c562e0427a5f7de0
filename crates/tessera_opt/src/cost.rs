//! Weighted cost of an implementation option.
//!
//! The cost is a weighted sum of three penalties, each already in `[0, 1]`:
//! lost throughput, latency relative to the flow's budget (saturating at 1),
//! and area relative to the largest candidate. Lower is better.

use crate::candidate::ImplementationOption;
use crate::error::OptimizeError;
use tessera_config::Weights;

/// Area at which the area penalty reaches 1.
pub const AREA_SCALE: f64 = 100.0;

/// Cost evaluator holding normalized objective weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    weights: Weights,
}

impl CostModel {
    /// Creates a cost model, rescaling `weights` to sum to 1.
    pub fn new(weights: &Weights) -> Result<Self, OptimizeError> {
        let weights = weights.normalized().ok_or(OptimizeError::InvalidWeights {
            throughput: weights.throughput,
            latency: weights.latency,
            area: weights.area,
        })?;
        Ok(Self { weights })
    }

    /// Returns the normalized weights.
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Computes the cost of `option` for a flow allowed `max_latency` cycles.
    ///
    /// A zero latency budget cannot be met by any option and takes the full
    /// latency penalty.
    pub fn cost(&self, option: &ImplementationOption, max_latency: u32) -> f64 {
        let throughput_penalty = 1.0 - option.throughput_score;
        let latency_penalty = if max_latency == 0 {
            1.0
        } else {
            (f64::from(option.latency_cycles) / f64::from(max_latency)).min(1.0)
        };
        let area_penalty = option.area_cost / AREA_SCALE;

        self.weights.throughput * throughput_penalty
            + self.weights.latency * latency_penalty
            + self.weights.area * area_penalty
    }
}
