//! In-memory model of an on-chip interconnect.
//!
//! A [`Graph`] holds typed [`Node`]s under stable [`NodeId`]s and an ordered
//! list of directed [`Edge`]s. Names are unique and bound through a
//! fail-fast [`NameRegistry`]. Passes rewrite the graph through
//! [`Graph::stage`] and [`Graph::commit`] so that nothing is mutated while
//! the original edge list is being walked.
//!
//! The [`document`] module converts between a graph and its serialized
//! [`TopologyDocument`] form.

#![warn(missing_docs)]

pub mod document;
pub mod edge;
pub mod error;
pub mod graph;
pub mod ids;
pub mod node;
pub mod registry;

pub use document::{
    load_topology_str, BandwidthAllocation, EdgeList, EdgeRecord, NodeRecord, TopologyConstraints,
    TopologyDocument,
};
pub use edge::Edge;
pub use error::{GraphError, GraphResult};
pub use graph::{Graph, StagedEdit};
pub use ids::NodeId;
pub use node::{Extra, Node, NodeKind};
pub use registry::NameRegistry;

/// Diagnostic codes emitted while loading documents.
pub mod codes {
    use tessera_diagnostics::{Category, DiagnosticCode};

    /// An edge references a node id that does not exist.
    pub const UNRESOLVED_EDGE: DiagnosticCode = DiagnosticCode::new(Category::Error, 1);
}
