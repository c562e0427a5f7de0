//! Traffic flows and clock domains shared by the generator and the optimizer.

use crate::frequency::Frequency;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The identity of a flow: an ordered (source name, target name) pair.
///
/// Ordered by source then target, so `BTreeMap<FlowKey, _>` iterates in a
/// stable, readable order.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct FlowKey {
    /// Name of the traffic source.
    pub src: String,
    /// Name of the traffic target.
    pub dst: String,
}

impl FlowKey {
    /// Creates a new flow key.
    pub fn new(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
        }
    }
}

impl fmt::Display for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.src, self.dst)
    }
}

/// A declared connectivity requirement between a named source and target.
///
/// Flows are independent of the physical graph. Several flows may share a
/// source or a target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    /// Name of the traffic source.
    pub src: String,
    /// Name of the traffic target.
    pub dst: String,
    /// Guaranteed bandwidth in GB/s.
    pub bandwidth: f64,
    /// Maximum tolerated latency in cycles.
    pub max_latency: u32,
    /// Relative priority; higher is more important.
    #[serde(default)]
    pub priority: u32,
}

impl Flow {
    /// Creates a new flow with priority 0.
    pub fn new(src: impl Into<String>, dst: impl Into<String>, bandwidth: f64, max_latency: u32) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            bandwidth,
            max_latency,
            priority: 0,
        }
    }

    /// Sets the priority of this flow.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Returns the (src, dst) key identifying this flow.
    pub fn key(&self) -> FlowKey {
        FlowKey::new(&self.src, &self.dst)
    }
}

/// A named timing region referenced by node attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClockDomain {
    /// Domain name, e.g. `"fast"`.
    pub name: String,
    /// Clock frequency of the domain.
    pub frequency: Frequency,
}

impl ClockDomain {
    /// Creates a new clock domain.
    pub fn new(name: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            name: name.into(),
            frequency,
        }
    }
}
