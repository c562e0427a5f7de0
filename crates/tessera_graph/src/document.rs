//! The topology document: the serialized form of a [`Graph`].
//!
//! Nodes are flat records whose kind-specific attributes sit next to `id`,
//! `kind`, and `name`. Loading extracts the attributes the passes read into
//! typed fields and keeps everything else as pass-through extras, so an
//! exported document carries the same information it was loaded from.

use crate::codes;
use crate::edge::Edge;
use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;
use crate::ids::NodeId;
use crate::node::{Extra, Node, NodeKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tessera_common::ClockDomain;
use tessera_diagnostics::{Diagnostic, DiagnosticSink};

/// A complete topology document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyDocument {
    /// Network name.
    pub network: String,
    /// Number of entries in `nodes`.
    pub num_nodes: usize,
    /// Node records in declared order.
    pub nodes: Vec<NodeRecord>,
    /// Edge list wrapper.
    pub graph: EdgeList,
    /// Network-wide constraints.
    #[serde(default)]
    pub constraints: TopologyConstraints,
}

/// One node as it appears in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node id.
    pub id: NodeId,
    /// Kind name, e.g. `"InterfaceAdapter"`.
    #[serde(alias = "type")]
    pub kind: String,
    /// Unique node name.
    pub name: String,
    /// Every other attribute.
    #[serde(flatten)]
    pub attributes: Extra,
}

/// The `graph` section of a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeList {
    /// Edges in declared order.
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// One edge as it appears in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Upstream node id.
    pub src: NodeId,
    /// Downstream node id.
    pub dst: NodeId,
    /// Data width in bits.
    pub width: u32,
    /// Latency in cycles.
    pub latency: u32,
    /// Pass-through attributes.
    #[serde(flatten)]
    pub extra: Extra,
}

/// Network-wide constraints consumed by downstream checkers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConstraints {
    /// Whether endpoints may only enter the fabric through adapters.
    pub niu_entry_only: bool,
    /// Clock domains referenced by nodes.
    pub clock_domains: Vec<ClockDomain>,
    /// Whether adjacent widths must match exactly.
    pub enforce_width_match: bool,
    /// Upper bound on any end-to-end path latency in cycles.
    pub max_end_to_end_latency: u32,
    /// Per-flow bandwidth guarantees.
    pub bandwidth_allocation: Vec<BandwidthAllocation>,
    /// Whether downstream checkers validate bandwidth.
    pub validate_bandwidth: bool,
    /// Whether downstream checkers validate latency.
    pub validate_latency: bool,
}

/// A bandwidth guarantee between a source and a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandwidthAllocation {
    /// Source name.
    pub source: String,
    /// Target name.
    pub target: String,
    /// Guaranteed bandwidth in GB/s.
    pub guaranteed_bw: f64,
    /// Maximum latency in cycles.
    pub max_latency: u32,
    /// Relative priority.
    #[serde(default)]
    pub priority: u32,
}

/// Parses a JSON topology document and builds its graph.
pub fn load_topology_str(json: &str, sink: &DiagnosticSink) -> GraphResult<Graph> {
    let doc: TopologyDocument =
        serde_json::from_str(json).map_err(|e| GraphError::MalformedDocument(e.to_string()))?;
    Graph::from_document(&doc, sink)
}

impl Graph {
    /// Builds a graph from a parsed document.
    ///
    /// Structural problems (node count mismatch, unknown kind, duplicate id
    /// or name, missing or mistyped attribute) abort the load. Edges naming
    /// unknown nodes are kept as-is and reported to `sink`.
    pub fn from_document(doc: &TopologyDocument, sink: &DiagnosticSink) -> GraphResult<Graph> {
        if doc.num_nodes != doc.nodes.len() {
            return Err(GraphError::MalformedDocument(format!(
                "num_nodes is {} but {} nodes are listed",
                doc.num_nodes,
                doc.nodes.len()
            )));
        }

        let mut graph = Graph::new();
        for record in &doc.nodes {
            let node = node_from_record(record)?;
            graph.add_node_with_id(record.id, node)?;
        }

        let mut unresolved = 0usize;
        for record in &doc.graph.edges {
            let edge = Edge {
                src: record.src,
                dst: record.dst,
                width: record.width,
                latency: record.latency,
                extra: record.extra.clone(),
            };
            if graph.contains(edge.src) && graph.contains(edge.dst) {
                graph.add_edge(edge)?;
            } else {
                unresolved += 1;
                tracing::warn!(src = %edge.src, dst = %edge.dst, "edge references an unknown node");
                sink.emit(
                    Diagnostic::warning(
                        codes::UNRESOLVED_EDGE,
                        format!(
                            "edge {} -> {} references a node that does not exist",
                            edge.src, edge.dst
                        ),
                    )
                    .with_subject(format!("{} -> {}", edge.src, edge.dst))
                    .with_note("the edge is kept unchanged and skipped by topology passes"),
                );
                graph.push_edge_unchecked(edge);
            }
        }

        tracing::debug!(
            network = %doc.network,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            unresolved,
            "loaded topology"
        );
        Ok(graph)
    }

    /// Exports the graph as a topology document.
    pub fn to_document(
        &self,
        network: impl Into<String>,
        constraints: TopologyConstraints,
    ) -> TopologyDocument {
        let nodes: Vec<NodeRecord> = self.nodes().map(|(id, node)| record_from_node(id, node)).collect();
        let edges = self
            .edges()
            .iter()
            .map(|e| EdgeRecord {
                src: e.src,
                dst: e.dst,
                width: e.width,
                latency: e.latency,
                extra: e.extra.clone(),
            })
            .collect();
        TopologyDocument {
            network: network.into(),
            num_nodes: nodes.len(),
            nodes,
            graph: EdgeList { edges },
            constraints,
        }
    }
}

fn canonical_kind(kind: &str) -> Option<&'static str> {
    Some(match kind {
        "Source" | "Initiator" => "Source",
        "Target" => "Target",
        "InterfaceAdapter" | "NIU" => "InterfaceAdapter",
        "Switch" | "Router" => "Switch",
        "Arbiter" => "Arbiter",
        "Decoder" => "Decoder",
        "WidthConverter" => "WidthConverter",
        "ClockConverter" => "ClockConverter",
        _ => return None,
    })
}

/// Attributes of one node record, consumed as typed fields are extracted.
struct Attributes<'a> {
    node: &'a str,
    map: Extra,
}

impl Attributes<'_> {
    /// Removes the first present key among `keys`.
    fn take(&mut self, keys: &[&str]) -> Option<(String, Value)> {
        keys.iter()
            .find_map(|k| self.map.remove(*k).map(|v| (k.to_string(), v)))
    }

    fn mistyped(&self, key: &str, expected: &str) -> GraphError {
        GraphError::MalformedDocument(format!(
            "node '{}': attribute '{key}' must be {expected}",
            self.node
        ))
    }

    fn missing(&self, key: &str) -> GraphError {
        GraphError::MalformedDocument(format!(
            "node '{}': missing required attribute '{key}'",
            self.node
        ))
    }

    fn u32(&mut self, keys: &[&str]) -> GraphResult<Option<u32>> {
        match self.take(keys) {
            None => Ok(None),
            Some((key, value)) => value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .map(Some)
                .ok_or_else(|| self.mistyped(&key, "a non-negative integer")),
        }
    }

    fn f64(&mut self, keys: &[&str]) -> GraphResult<Option<f64>> {
        match self.take(keys) {
            None => Ok(None),
            Some((key, value)) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.mistyped(&key, "a number")),
        }
    }

    fn string(&mut self, keys: &[&str]) -> GraphResult<Option<String>> {
        match self.take(keys) {
            None => Ok(None),
            Some((_, Value::String(s))) => Ok(Some(s)),
            Some((key, _)) => Err(self.mistyped(&key, "a string")),
        }
    }

    fn required_u32(&mut self, key: &str) -> GraphResult<u32> {
        self.u32(&[key])?.ok_or_else(|| self.missing(key))
    }

    fn required_string(&mut self, key: &str) -> GraphResult<String> {
        self.string(&[key])?.ok_or_else(|| self.missing(key))
    }
}

fn node_from_record(record: &NodeRecord) -> GraphResult<Node> {
    let kind_name = canonical_kind(&record.kind).ok_or_else(|| {
        GraphError::MalformedDocument(format!(
            "node '{}' has unknown kind '{}'",
            record.name, record.kind
        ))
    })?;
    if record.name.is_empty() {
        return Err(GraphError::MalformedDocument(format!(
            "node {} has an empty name",
            record.id
        )));
    }

    let mut attrs = Attributes {
        node: &record.name,
        map: record.attributes.clone(),
    };
    let width = attrs.u32(&["width"])?;
    let clock_domain = attrs.string(&["clock_domain"])?;

    let kind = match kind_name {
        "Source" => NodeKind::Source {
            avg_throughput: attrs.f64(&["avg_throughput"])?.unwrap_or(0.0),
            max_throughput: attrs.f64(&["max_throughput"])?.unwrap_or(0.0),
            latency_requirement: attrs
                .u32(&["latency_requirement", "latency_req"])?
                .unwrap_or(0),
            priority: attrs.u32(&["priority"])?.unwrap_or(0),
        },
        "Target" => NodeKind::Target {
            max_bandwidth: attrs.f64(&["max_bandwidth"])?.unwrap_or(0.0),
            latency: attrs.u32(&["latency"])?.unwrap_or(0),
            size: attrs.f64(&["size"])?.unwrap_or(0.0),
        },
        "InterfaceAdapter" => NodeKind::InterfaceAdapter,
        "Switch" => NodeKind::Switch {
            port_count: attrs.u32(&["port_count", "num_ports"])?.unwrap_or(0),
        },
        "Arbiter" => NodeKind::Arbiter {
            input_count: attrs.u32(&["input_count", "num_inputs"])?.unwrap_or(0),
        },
        "Decoder" => NodeKind::Decoder {
            output_count: attrs.u32(&["output_count", "num_outputs"])?.unwrap_or(0),
        },
        "WidthConverter" => NodeKind::WidthConverter {
            src_width: attrs.required_u32("src_width")?,
            dst_width: attrs.required_u32("dst_width")?,
        },
        _ => NodeKind::ClockConverter {
            src_clock_domain: attrs.required_string("src_clock_domain")?,
            dst_clock_domain: attrs.required_string("dst_clock_domain")?,
        },
    };

    Ok(Node {
        name: record.name.clone(),
        kind,
        width,
        clock_domain,
        extra: attrs.map,
    })
}

fn record_from_node(id: NodeId, node: &Node) -> NodeRecord {
    let mut attributes = node.extra.clone();
    if let Some(width) = node.width {
        attributes.insert("width".into(), width.into());
    }
    if let Some(domain) = &node.clock_domain {
        attributes.insert("clock_domain".into(), domain.clone().into());
    }
    match &node.kind {
        NodeKind::Source {
            avg_throughput,
            max_throughput,
            latency_requirement,
            priority,
        } => {
            attributes.insert("avg_throughput".into(), (*avg_throughput).into());
            attributes.insert("max_throughput".into(), (*max_throughput).into());
            attributes.insert("latency_requirement".into(), (*latency_requirement).into());
            attributes.insert("priority".into(), (*priority).into());
        }
        NodeKind::Target {
            max_bandwidth,
            latency,
            size,
        } => {
            attributes.insert("max_bandwidth".into(), (*max_bandwidth).into());
            attributes.insert("latency".into(), (*latency).into());
            attributes.insert("size".into(), (*size).into());
        }
        NodeKind::InterfaceAdapter => {}
        NodeKind::Switch { port_count } => {
            attributes.insert("port_count".into(), (*port_count).into());
        }
        NodeKind::Arbiter { input_count } => {
            attributes.insert("input_count".into(), (*input_count).into());
        }
        NodeKind::Decoder { output_count } => {
            attributes.insert("output_count".into(), (*output_count).into());
        }
        NodeKind::WidthConverter {
            src_width,
            dst_width,
        } => {
            attributes.insert("src_width".into(), (*src_width).into());
            attributes.insert("dst_width".into(), (*dst_width).into());
        }
        NodeKind::ClockConverter {
            src_clock_domain,
            dst_clock_domain,
        } => {
            attributes.insert("src_clock_domain".into(), src_clock_domain.clone().into());
            attributes.insert("dst_clock_domain".into(), dst_clock_domain.clone().into());
        }
    }
    NodeRecord {
        id,
        kind: node.kind.name().to_string(),
        name: node.name.clone(),
        attributes,
    }
}
