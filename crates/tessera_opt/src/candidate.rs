//! Implementation candidates offered for a flow.

use serde::Serialize;
use std::fmt;

/// Bandwidth at or above which a dedicated Direct path is offered, in GB/s.
pub const DIRECT_THRESHOLD: f64 = 50.0;

/// Bandwidth below which an Arbitrated path is offered, in GB/s.
pub const ARBITRATED_THRESHOLD: f64 = 5.0;

/// A physical realization of a flow.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub enum ImplementationKind {
    /// A dedicated router on the shortest path.
    Direct,
    /// The central shared fabric.
    SharedFabric,
    /// An arbiter in front of the shared fabric.
    Arbitrated,
}

impl fmt::Display for ImplementationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImplementationKind::Direct => "Direct",
            ImplementationKind::SharedFabric => "SharedFabric",
            ImplementationKind::Arbitrated => "Arbitrated",
        };
        f.write_str(name)
    }
}

/// One candidate realization and its fixed figures of merit.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct ImplementationOption {
    /// The realization.
    pub kind: ImplementationKind,
    /// Contention-free share of throughput in `[0, 1]`; higher is better.
    pub throughput_score: f64,
    /// Path latency in cycles.
    pub latency_cycles: u32,
    /// Relative area on a 0-100 scale.
    pub area_cost: f64,
    /// Whether admitting the flow consumes shared-fabric capacity.
    pub uses_shared_fabric: bool,
}

impl ImplementationOption {
    /// The dedicated path. Always constructible, whatever the bandwidth.
    pub const fn direct() -> Self {
        Self {
            kind: ImplementationKind::Direct,
            throughput_score: 1.0,
            latency_cycles: 2,
            area_cost: 100.0,
            uses_shared_fabric: false,
        }
    }

    /// The shared-fabric path.
    pub const fn shared_fabric() -> Self {
        Self {
            kind: ImplementationKind::SharedFabric,
            throughput_score: 0.7,
            latency_cycles: 4,
            area_cost: 5.0,
            uses_shared_fabric: true,
        }
    }

    /// The arbitrated path. Its traffic still crosses the shared fabric.
    pub const fn arbitrated() -> Self {
        Self {
            kind: ImplementationKind::Arbitrated,
            throughput_score: 0.5,
            latency_cycles: 6,
            area_cost: 2.0,
            uses_shared_fabric: true,
        }
    }
}

/// Returns the candidates offered for a flow of `bandwidth` GB/s.
///
/// SharedFabric is always offered. Direct needs at least
/// [`DIRECT_THRESHOLD`]; Arbitrated needs less than [`ARBITRATED_THRESHOLD`].
/// Candidates come back in [`ImplementationKind`] order.
pub fn candidates(bandwidth: f64) -> Vec<ImplementationOption> {
    let mut options = Vec::with_capacity(2);
    if bandwidth >= DIRECT_THRESHOLD {
        options.push(ImplementationOption::direct());
    }
    options.push(ImplementationOption::shared_fabric());
    if bandwidth < ARBITRATED_THRESHOLD {
        options.push(ImplementationOption::arbitrated());
    }
    options
}
