//! Error types for the implementation optimizer.

use tessera_common::FlowKey;

/// Errors that abort an optimization run.
#[derive(Debug, thiserror::Error)]
pub enum OptimizeError {
    /// The objective weights cannot be normalized.
    #[error(
        "invalid optimization weights (throughput {throughput}, latency {latency}, area {area})"
    )]
    InvalidWeights {
        /// Throughput weight as given.
        throughput: f64,
        /// Latency weight as given.
        latency: f64,
        /// Area weight as given.
        area: f64,
    },

    /// Several input flows share a key and the reject policy is active.
    #[error("duplicate flow keys: {}", join(.0))]
    DuplicateFlows(Vec<FlowKey>),

    /// No candidate fits the shared fabric and the strict policy is active.
    #[error("no feasible implementation for: {}", join(.0))]
    Infeasible(Vec<FlowKey>),
}

fn join(keys: &[FlowKey]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_duplicates() {
        let err = OptimizeError::DuplicateFlows(vec![
            FlowKey::new("CPU0", "DDR0"),
            FlowKey::new("DMA", "SRAM"),
        ]);
        assert_eq!(
            err.to_string(),
            "duplicate flow keys: CPU0 -> DDR0, DMA -> SRAM"
        );
    }

    #[test]
    fn display_infeasible() {
        let err = OptimizeError::Infeasible(vec![FlowKey::new("GPU", "HBM0")]);
        assert_eq!(err.to_string(), "no feasible implementation for: GPU -> HBM0");
    }
}
