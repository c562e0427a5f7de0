//! Bijective mapping between node names and node ids.

use crate::ids::NodeId;
use std::collections::HashMap;

/// Name-to-id registry that refuses to rebind a name.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    by_name: HashMap<String, NodeId>,
}

impl NameRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `id`.
    ///
    /// Returns the id already holding the name if it is taken.
    pub fn insert(&mut self, name: &str, id: NodeId) -> Result<(), NodeId> {
        if let Some(&existing) = self.by_name.get(name) {
            return Err(existing);
        }
        self.by_name.insert(name.to_string(), id);
        Ok(())
    }

    /// Looks up the id bound to `name`.
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Returns `true` if `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Returns the number of bound names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if no names are bound.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
