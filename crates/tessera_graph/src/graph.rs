//! The interconnect graph: an id-keyed node store, an ordered edge list, and
//! a staged-edit workflow for passes that rewrite the graph.
//!
//! Nodes keep their insertion order. Ids are never reused: the allocator
//! always hands out an id strictly above every id seen so far, including
//! sparse ids loaded from a document.
//!
//! Passes do not mutate the graph while they iterate over it. They call
//! [`Graph::stage`], which snapshots the edge list and reserves the next id,
//! compute their rewrite against the snapshot, and hand the result back to
//! [`Graph::commit`], which applies it as a single step.

use crate::edge::Edge;
use crate::error::{GraphError, GraphResult};
use crate::ids::NodeId;
use crate::node::{Node, NodeKind};
use crate::registry::NameRegistry;
use std::collections::{BTreeMap, HashMap, HashSet};

/// An interconnect graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<(NodeId, Node)>,
    slots: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
    names: NameRegistry,
    next_id: u32,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node under a freshly allocated id.
    pub fn add_node(&mut self, node: Node) -> GraphResult<NodeId> {
        let id = NodeId::from_raw(self.next_id);
        self.add_node_with_id(id, node)?;
        Ok(id)
    }

    /// Adds a node under an explicit id, as when loading a document.
    pub fn add_node_with_id(&mut self, id: NodeId, node: Node) -> GraphResult<()> {
        if self.slots.contains_key(&id) {
            return Err(GraphError::DuplicateId(id));
        }
        self.names
            .insert(&node.name, id)
            .map_err(|existing| GraphError::DuplicateName {
                name: node.name.clone(),
                existing,
            })?;
        self.slots.insert(id, self.nodes.len());
        self.nodes.push((id, node));
        self.next_id = self.next_id.max(id.next().as_raw());
        Ok(())
    }

    /// Adds an edge whose endpoints must both exist.
    pub fn add_edge(&mut self, edge: Edge) -> GraphResult<()> {
        if !self.contains(edge.src) || !self.contains(edge.dst) {
            return Err(GraphError::UnresolvedReference {
                src: edge.src,
                dst: edge.dst,
            });
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Appends an edge without resolving its endpoints.
    pub(crate) fn push_edge_unchecked(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Returns `true` if a node with this id exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Returns the node with this id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(&id).map(|&slot| &self.nodes[slot].1)
    }

    /// Returns the kind of the node with this id for in-place updates.
    ///
    /// Names are not reachable mutably, which keeps the registry consistent.
    pub fn kind_mut(&mut self, id: NodeId) -> Option<&mut NodeKind> {
        let slot = *self.slots.get(&id)?;
        Some(&mut self.nodes[slot].1.kind)
    }

    /// Looks up a node id by name.
    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.names.get(name)
    }

    /// Iterates over nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the edges in declared order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the id the next allocated node will receive.
    pub fn next_id(&self) -> NodeId {
        NodeId::from_raw(self.next_id)
    }

    /// Returns the width neighbours of `id` should agree with.
    pub fn resolved_width(&self, id: NodeId) -> Option<u32> {
        self.node(id).and_then(Node::resolved_width)
    }

    /// Returns the clock domain of `id`, if it declares one.
    pub fn clock_domain(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(|n| n.clock_domain.as_deref())
    }

    /// Counts the edges touching `id` at either end.
    pub fn incident_edge_count(&self, id: NodeId) -> usize {
        self.edges.iter().filter(|e| e.touches(id)).count()
    }

    /// Counts nodes per kind name.
    pub fn kind_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for (_, node) in &self.nodes {
            *counts.entry(node.kind.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Returns `base` if no node in the graph or in `edit` uses it, otherwise
    /// the first free `base_<n>` with `n` counting from 1.
    pub fn free_name(&self, edit: &StagedEdit, base: &str) -> String {
        let taken = |name: &str| self.names.contains(name) || edit.is_pending(name);
        if !taken(base) {
            return base.to_string();
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("{base}_{n}");
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Snapshots the edge list and reserves ids for a rewrite.
    pub fn stage(&self) -> StagedEdit {
        StagedEdit {
            base_id: self.next_id,
            base_edge_count: self.edges.len(),
            base_node_count: self.nodes.len(),
            next_id: self.next_id,
            nodes: Vec::new(),
            pending: HashSet::new(),
            edges: self.edges.clone(),
        }
    }

    /// Applies a staged edit.
    ///
    /// Fails without touching the graph if the graph changed since
    /// [`stage`](Self::stage) or if a staged name is already taken. On success,
    /// staged nodes are appended in allocation order, the edge list is
    /// replaced, and the ids of the appended nodes are returned.
    pub fn commit(&mut self, edit: StagedEdit) -> GraphResult<Vec<NodeId>> {
        if edit.base_id != self.next_id
            || edit.base_edge_count != self.edges.len()
            || edit.base_node_count != self.nodes.len()
        {
            return Err(GraphError::StaleEdit);
        }
        for (_, node) in &edit.nodes {
            if let Some(existing) = self.names.get(&node.name) {
                return Err(GraphError::DuplicateName {
                    name: node.name.clone(),
                    existing,
                });
            }
        }

        let mut added = Vec::with_capacity(edit.nodes.len());
        for (id, node) in edit.nodes {
            self.add_node_with_id(id, node)?;
            added.push(id);
        }
        self.edges = edit.edges;
        self.next_id = self.next_id.max(edit.next_id);
        Ok(added)
    }
}

/// A pending rewrite computed against a snapshot of a [`Graph`].
///
/// `edges` starts as a copy of the graph's edges and becomes the graph's
/// whole edge list on commit.
#[derive(Debug, Clone)]
pub struct StagedEdit {
    base_id: u32,
    base_edge_count: usize,
    base_node_count: usize,
    next_id: u32,
    nodes: Vec<(NodeId, Node)>,
    pending: HashSet<String>,
    /// The edge list the graph will hold after commit.
    pub edges: Vec<Edge>,
}

impl StagedEdit {
    /// Reserves the next id for `node` and queues it for insertion.
    ///
    /// Staged names must be unique among themselves; a repeated name is
    /// rejected here rather than at commit.
    pub fn alloc(&mut self, node: Node) -> GraphResult<NodeId> {
        if !self.pending.insert(node.name.clone()) {
            let existing = self
                .nodes
                .iter()
                .find(|(_, n)| n.name == node.name)
                .map_or(NodeId::from_raw(self.next_id), |(id, _)| *id);
            return Err(GraphError::DuplicateName {
                name: node.name,
                existing,
            });
        }
        let id = NodeId::from_raw(self.next_id);
        self.next_id += 1;
        self.nodes.push((id, node));
        Ok(id)
    }

    /// Returns `true` if a staged node already uses `name`.
    pub fn is_pending(&self, name: &str) -> bool {
        self.pending.contains(name)
    }

    /// Returns `true` if the edit adds no node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
