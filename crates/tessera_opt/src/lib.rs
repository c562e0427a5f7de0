//! Constraint-based selection of flow implementations.
//!
//! Every declared flow must be connected; what varies is how. For each flow
//! the optimizer offers a set of [`ImplementationOption`]s (a dedicated
//! Direct path, the shared fabric, or an arbiter in front of it), prices them
//! with a weighted throughput/latency/area [`CostModel`], and greedily picks
//! the cheapest one that fits the shared-fabric capacity. Duplicate flow keys
//! and capacity exhaustion are handled by explicit policies from
//! [`OptimizationConfig`](tessera_config::OptimizationConfig) and reported
//! through a [`DiagnosticSink`](tessera_diagnostics::DiagnosticSink).

#![warn(missing_docs)]

pub mod candidate;
pub mod cost;
pub mod dedup;
pub mod error;
pub mod errors;
pub mod select;

pub use candidate::{candidates, ImplementationKind, ImplementationOption};
pub use cost::CostModel;
pub use dedup::{resolve_duplicates, DuplicateFlow};
pub use error::OptimizeError;
pub use select::{optimize, Assignment, FlowOutcome, Optimization, OptimizationSummary};
