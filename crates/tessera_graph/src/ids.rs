//! Opaque node identifiers.
//!
//! [`NodeId`] is a thin `u32` wrapper. Ids come either from a loaded document,
//! where they may be sparse, or from the graph's own allocator, which always
//! hands out values strictly above the current maximum.

use serde::{Deserialize, Serialize};

/// Opaque, copyable ID for a node in an interconnect graph.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates an ID from a raw `u32` value.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` value.
    pub fn as_raw(self) -> u32 {
        self.0
    }

    /// Returns the ID immediately after this one.
    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
