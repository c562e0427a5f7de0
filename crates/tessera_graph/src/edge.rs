//! Directed, possibly parallel connections between nodes.

use crate::ids::NodeId;
use crate::node::Extra;

/// A directed link between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    /// Upstream node.
    pub src: NodeId,
    /// Downstream node.
    pub dst: NodeId,
    /// Data width in bits.
    pub width: u32,
    /// Latency in cycles.
    pub latency: u32,
    /// Pass-through attributes.
    pub extra: Extra,
}

impl Edge {
    /// Creates an edge without extra attributes.
    pub fn new(src: NodeId, dst: NodeId, width: u32, latency: u32) -> Self {
        Self {
            src,
            dst,
            width,
            latency,
            extra: Extra::new(),
        }
    }

    /// Returns a copy of this edge rerouted between `src` and `dst` with the
    /// given width and latency. Extras are carried over.
    pub fn hop(&self, src: NodeId, dst: NodeId, width: u32, latency: u32) -> Self {
        Self {
            src,
            dst,
            width,
            latency,
            extra: self.extra.clone(),
        }
    }

    /// Returns `true` if this edge touches `id` at either end.
    pub fn touches(&self, id: NodeId) -> bool {
        self.src == id || self.dst == id
    }
}
