//! Error types for graph construction, editing, and document loading.

use crate::ids::NodeId;

/// Errors raised by the graph model.
///
/// Structural document problems abort a load. Edges with unknown endpoints
/// are not errors during a load; they are kept and reported instead.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The topology document is missing a field or is internally inconsistent.
    #[error("malformed topology document: {0}")]
    MalformedDocument(String),

    /// A node name is already bound to another node.
    #[error("node name '{name}' is already used by node {existing}")]
    DuplicateName {
        /// The colliding name.
        name: String,
        /// The node already holding the name.
        existing: NodeId,
    },

    /// A node id is already in use.
    #[error("node id {0} is already in use")]
    DuplicateId(NodeId),

    /// An edge names a node that does not exist.
    #[error("edge {src} -> {dst} references a node that does not exist")]
    UnresolvedReference {
        /// Source endpoint id.
        src: NodeId,
        /// Destination endpoint id.
        dst: NodeId,
    },

    /// A staged edit was committed after the graph changed underneath it.
    #[error("staged edit is stale: the graph changed after it was staged")]
    StaleEdit,
}

/// Shorthand result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_duplicate_name() {
        let err = GraphError::DuplicateName {
            name: "CPU0".to_string(),
            existing: NodeId::from_raw(3),
        };
        assert_eq!(
            err.to_string(),
            "node name 'CPU0' is already used by node 3"
        );
    }

    #[test]
    fn display_unresolved() {
        let err = GraphError::UnresolvedReference {
            src: NodeId::from_raw(1),
            dst: NodeId::from_raw(99),
        };
        assert_eq!(
            err.to_string(),
            "edge 1 -> 99 references a node that does not exist"
        );
    }
}
