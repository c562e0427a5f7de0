//! Interconnect building blocks and their kind-specific attributes.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Uninterpreted attributes carried through load and export unchanged.
pub type Extra = BTreeMap<String, Value>;

/// The closed set of interconnect building blocks.
///
/// Each variant carries the attributes the passes read for that kind.
/// Width and clock domain are common to all kinds and live on [`Node`].
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// A component originating traffic.
    Source {
        /// Average throughput in GB/s.
        avg_throughput: f64,
        /// Peak throughput in GB/s.
        max_throughput: f64,
        /// Latency requirement in cycles.
        latency_requirement: u32,
        /// Relative priority.
        priority: u32,
    },
    /// A memory or peripheral receiving traffic.
    Target {
        /// Peak bandwidth in GB/s.
        max_bandwidth: f64,
        /// Access latency in cycles.
        latency: u32,
        /// Capacity in GB.
        size: f64,
    },
    /// The mandatory entry/exit bridge between an endpoint and the fabric.
    InterfaceAdapter,
    /// A switch (crossbar or dedicated router).
    Switch {
        /// Number of ports.
        port_count: u32,
    },
    /// An arbiter multiplexing several inputs onto one output.
    Arbiter {
        /// Number of arbitrated inputs.
        input_count: u32,
    },
    /// An address decoder fanning one input out to several outputs.
    Decoder {
        /// Number of decoded outputs.
        output_count: u32,
    },
    /// A data-width bridge.
    WidthConverter {
        /// Width on the upstream side.
        src_width: u32,
        /// Width on the downstream side.
        dst_width: u32,
    },
    /// A clock-domain-crossing bridge.
    ClockConverter {
        /// Upstream clock domain.
        src_clock_domain: String,
        /// Downstream clock domain.
        dst_clock_domain: String,
    },
}

impl NodeKind {
    /// Returns the canonical document name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Source { .. } => "Source",
            NodeKind::Target { .. } => "Target",
            NodeKind::InterfaceAdapter => "InterfaceAdapter",
            NodeKind::Switch { .. } => "Switch",
            NodeKind::Arbiter { .. } => "Arbiter",
            NodeKind::Decoder { .. } => "Decoder",
            NodeKind::WidthConverter { .. } => "WidthConverter",
            NodeKind::ClockConverter { .. } => "ClockConverter",
        }
    }

    /// Returns `true` for inserted bridging kinds.
    pub fn is_converter(&self) -> bool {
        matches!(
            self,
            NodeKind::WidthConverter { .. } | NodeKind::ClockConverter { .. }
        )
    }

    /// Returns `true` for [`NodeKind::WidthConverter`].
    pub fn is_width_converter(&self) -> bool {
        matches!(self, NodeKind::WidthConverter { .. })
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of the interconnect graph.
///
/// The node's id is owned by the [`Graph`](crate::Graph) it lives in.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Unique node name.
    pub name: String,
    /// Kind and kind-specific attributes.
    pub kind: NodeKind,
    /// Explicit data width in bits.
    pub width: Option<u32>,
    /// Name of the clock domain the node runs in.
    pub clock_domain: Option<String>,
    /// Pass-through attributes.
    pub extra: Extra,
}

impl Node {
    /// Creates a node with no width, no clock domain, and no extras.
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            width: None,
            clock_domain: None,
            extra: Extra::new(),
        }
    }

    /// Sets the explicit width.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the clock domain.
    pub fn with_clock_domain(mut self, domain: impl Into<String>) -> Self {
        self.clock_domain = Some(domain.into());
        self
    }

    /// Adds a pass-through attribute.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The width seen by neighbours: the explicit width, otherwise a width
    /// converter's upstream width.
    pub fn resolved_width(&self) -> Option<u32> {
        self.width.or(match self.kind {
            NodeKind::WidthConverter { src_width, .. } => Some(src_width),
            _ => None,
        })
    }
}
