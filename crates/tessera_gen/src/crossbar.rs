//! Full-crossbar generation from a high-level specification.
//!
//! Every source gets a source node and a dedicated interface adapter; every
//! target gets an adapter and a target node. All source-side adapters feed a
//! single switch named `Crossbar`, which feeds every target-side adapter, so
//! each source reaches each target through exactly one shared hop.

use crate::sizing::{select_width, ClockClass};
use std::collections::BTreeMap;
use tessera_common::FlowKey;
use tessera_config::SpecDocument;
use tessera_graph::{Edge, Graph, GraphResult, Node, NodeId, NodeKind};

/// Name of the central switch.
pub const SWITCH_NAME: &str = "Crossbar";

/// Clock domain of the central switch.
pub const SWITCH_CLOCK: &str = "fast";

/// Latency of a source-to-adapter edge.
pub const SOURCE_EDGE_LATENCY: u32 = 1;

/// Latency of an adapter-to-switch or switch-to-adapter edge.
pub const SWITCH_EDGE_LATENCY: u32 = 2;

/// Where the bandwidth pass put a flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowPlacement {
    /// A dedicated two-port router between the two adapters.
    Dedicated {
        /// The router node.
        router: NodeId,
    },
    /// The shared central switch.
    Shared,
    /// An arbiter in front of the shared switch.
    Arbitrated {
        /// The arbiter node.
        arbiter: NodeId,
    },
}

/// A generated crossbar and the bookkeeping later passes need.
#[derive(Debug, Clone)]
pub struct CrossbarTopology {
    /// The generated graph.
    pub graph: Graph,
    /// The central switch.
    pub switch: NodeId,
    /// Source name to source-side adapter.
    pub source_adapters: BTreeMap<String, NodeId>,
    /// Target name to target-side adapter.
    pub target_adapters: BTreeMap<String, NodeId>,
    pub(crate) placements: BTreeMap<FlowKey, FlowPlacement>,
}

impl CrossbarTopology {
    /// Returns where the bandwidth pass placed `key`, if it has run.
    pub fn placement(&self, key: &FlowKey) -> Option<&FlowPlacement> {
        self.placements.get(key)
    }

    /// Iterates over every placed flow in key order.
    pub fn placements(&self) -> impl Iterator<Item = (&FlowKey, &FlowPlacement)> {
        self.placements.iter()
    }

    /// Returns the port count recorded on the switch node.
    pub fn switch_ports(&self) -> u32 {
        match self.graph.node(self.switch).map(|n| &n.kind) {
            Some(NodeKind::Switch { port_count }) => *port_count,
            _ => 0,
        }
    }
}

fn adapter_name(endpoint: &str) -> String {
    format!("{endpoint}_NIU")
}

/// Builds the full crossbar for `spec`.
///
/// Adapter widths come from the endpoint's peak bandwidth at the frequency
/// of its clock class; the switch width is the widest endpoint width at the
/// default frequency. Fails only if generated names collide.
pub fn generate_crossbar(spec: &SpecDocument) -> GraphResult<CrossbarTopology> {
    let constraints = &spec.constraints;
    let mut graph = Graph::new();
    let mut source_adapters = BTreeMap::new();
    let mut target_adapters = BTreeMap::new();

    for source in &spec.sources {
        let node = Node::new(
            &source.name,
            NodeKind::Source {
                avg_throughput: source.avg_throughput,
                max_throughput: source.max_throughput,
                latency_requirement: source.latency_requirement,
                priority: source.priority,
            },
        )
        .with_extra("traffic_pattern", "bursty");
        let source_id = graph.add_node(node)?;

        let clock = ClockClass::classify(source.max_throughput);
        let width = select_width(source.max_throughput, constraints.frequency_of(clock.as_str()));
        let adapter = graph.add_node(
            Node::new(adapter_name(&source.name), NodeKind::InterfaceAdapter)
                .with_width(width)
                .with_clock_domain(clock.as_str()),
        )?;
        graph.add_edge(Edge::new(source_id, adapter, width, SOURCE_EDGE_LATENCY))?;
        tracing::debug!(source = %source.name, width, clock = clock.as_str(), "created source adapter");
        source_adapters.insert(source.name.clone(), adapter);
    }

    for target in &spec.targets {
        let node = Node::new(
            &target.name,
            NodeKind::Target {
                max_bandwidth: target.max_bandwidth,
                latency: target.latency,
                size: target.size,
            },
        )
        .with_extra("type_detail", target.kind.as_str());
        let target_id = graph.add_node(node)?;

        let clock = ClockClass::classify(target.max_bandwidth);
        let width = select_width(target.max_bandwidth, constraints.frequency_of(clock.as_str()));
        let adapter = graph.add_node(
            Node::new(adapter_name(&target.name), NodeKind::InterfaceAdapter)
                .with_width(width)
                .with_clock_domain(clock.as_str()),
        )?;
        graph.add_edge(Edge::new(adapter, target_id, width, target.latency / 10))?;
        tracing::debug!(target = %target.name, width, clock = clock.as_str(), "created target adapter");
        target_adapters.insert(target.name.clone(), adapter);
    }

    let switch_width = spec
        .sources
        .iter()
        .map(|s| s.max_throughput)
        .chain(spec.targets.iter().map(|t| t.max_bandwidth))
        .map(|bw| select_width(bw, constraints.default_frequency))
        .max()
        .unwrap_or(constraints.default_data_width);
    let port_count = u32::try_from(spec.sources.len() + spec.targets.len()).unwrap_or(u32::MAX);
    let switch = graph.add_node(
        Node::new(SWITCH_NAME, NodeKind::Switch { port_count })
            .with_width(switch_width)
            .with_clock_domain(SWITCH_CLOCK),
    )?;

    for source in &spec.sources {
        let adapter = source_adapters[&source.name];
        let width = graph.resolved_width(adapter).unwrap_or(switch_width);
        graph.add_edge(Edge::new(adapter, switch, width, SWITCH_EDGE_LATENCY))?;
    }
    for target in &spec.targets {
        let adapter = target_adapters[&target.name];
        let width = graph.resolved_width(adapter).unwrap_or(switch_width);
        graph.add_edge(Edge::new(switch, adapter, width, SWITCH_EDGE_LATENCY))?;
    }

    tracing::info!(
        sources = spec.sources.len(),
        targets = spec.targets.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        switch_width,
        "generated full crossbar"
    );
    Ok(CrossbarTopology {
        graph,
        switch,
        source_adapters,
        target_adapters,
        placements: BTreeMap::new(),
    })
}
