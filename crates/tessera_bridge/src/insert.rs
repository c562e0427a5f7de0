//! The converter-insertion pass.

use crate::analysis::{split_latency_three, split_latency_two, BridgePlan, EdgeCheck};
use crate::errors;
use tessera_diagnostics::DiagnosticSink;
use tessera_graph::{Edge, Graph, GraphResult, Node, NodeId, NodeKind, StagedEdit};

/// A converter node added by [`insert_converters`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertedConverter {
    /// Id of the new node.
    pub id: NodeId,
    /// Name of the new node.
    pub name: String,
    /// Kind name, `ClockConverter` or `WidthConverter`.
    pub kind: &'static str,
    /// The original edge it bridges, as `src -> dst` node names.
    pub edge: String,
}

/// An edge passed through unchanged because an endpoint does not exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedEdge {
    /// Position of the edge in the original edge list.
    pub index: usize,
    /// Upstream id as declared.
    pub src: NodeId,
    /// Downstream id as declared.
    pub dst: NodeId,
}

/// What [`insert_converters`] did, item by item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Inserted nodes in id order.
    pub inserted: Vec<InsertedConverter>,
    /// Edges left alone because they could not be analyzed.
    pub skipped: Vec<SkippedEdge>,
    /// Number of original edges that were split.
    pub rewritten_edges: usize,
}

impl ConversionReport {
    /// Returns `true` if the pass changed nothing.
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty()
    }
}

/// Inserts clock and width converters on every mismatched edge.
///
/// Edges are checked in declared order against the graph as it was before
/// the pass; inserted converters are never re-examined. New nodes get ids
/// above the current maximum in insertion order and are added to the graph
/// only once every edge has been processed. Edges with a missing endpoint are
/// kept verbatim and reported.
///
/// Running the pass on its own output inserts nothing.
pub fn insert_converters(graph: &mut Graph, sink: &DiagnosticSink) -> GraphResult<ConversionReport> {
    let mut edit = graph.stage();
    let original = std::mem::take(&mut edit.edges);
    let mut report = ConversionReport::default();

    for (index, edge) in original.into_iter().enumerate() {
        let Some(check) = EdgeCheck::of(graph, &edge) else {
            let label = format!("{} -> {}", edge.src, edge.dst);
            tracing::warn!(edge = %label, "skipping edge with unknown endpoint");
            sink.emit(errors::unresolved_edge(&label));
            report.skipped.push(SkippedEdge {
                index,
                src: edge.src,
                dst: edge.dst,
            });
            edit.edges.push(edge);
            continue;
        };

        let plan = check.plan();
        if plan == BridgePlan::Keep {
            edit.edges.push(edge);
            continue;
        }

        let mut rewrite = Rewrite {
            graph: &*graph,
            edit: &mut edit,
            sink,
            edge: &edge,
            check: &check,
            inserted: Vec::new(),
        };
        rewrite.apply()?;
        let inserted = rewrite.inserted;

        let label = rewrite_label(graph, &edge);
        let reason = plan.reason();
        tracing::debug!(edge = %label, hops = plan.hops(), reason, "split edge");
        sink.emit(errors::edge_split(&label, plan.hops(), reason));
        for converter in &inserted {
            sink.emit(errors::converter_inserted(&converter.name, converter.kind, &label));
        }
        report.inserted.extend(inserted);
        report.rewritten_edges += 1;
    }

    if !edit.is_empty() {
        graph.commit(edit)?;
    }

    tracing::info!(
        inserted = report.inserted.len(),
        rewritten = report.rewritten_edges,
        skipped = report.skipped.len(),
        "converter insertion complete"
    );
    Ok(report)
}

fn rewrite_label(graph: &Graph, edge: &Edge) -> String {
    let name = |id: NodeId| graph.node(id).map_or_else(|| id.to_string(), |n| n.name.clone());
    format!("{} -> {}", name(edge.src), name(edge.dst))
}

/// Rewrites one mismatched edge into the staged edit.
struct Rewrite<'a> {
    graph: &'a Graph,
    edit: &'a mut StagedEdit,
    sink: &'a DiagnosticSink,
    edge: &'a Edge,
    check: &'a EdgeCheck,
    inserted: Vec<InsertedConverter>,
}

impl Rewrite<'_> {
    fn endpoint_names(&self) -> (&str, &str) {
        let src = self.graph.node(self.edge.src).map_or("", |n| n.name.as_str());
        let dst = self.graph.node(self.edge.dst).map_or("", |n| n.name.as_str());
        (src, dst)
    }

    fn apply(&mut self) -> GraphResult<()> {
        match (self.check.clock_crossing.clone(), self.check.needs_width_bridge) {
            (Some((src_clock, dst_clock)), true) => self.clock_then_width(src_clock, dst_clock),
            (Some((src_clock, dst_clock)), false) => self.clock_only(src_clock, dst_clock),
            (None, true) => self.width_only(),
            (None, false) => {
                self.edit.edges.push(self.edge.clone());
                Ok(())
            }
        }
    }

    /// Picks `{src}_{dst}_{suffix}`, or the first free `_<n>` variant.
    fn converter_name(&self, suffix: &str) -> String {
        let (src, dst) = self.endpoint_names();
        let base = format!("{src}_{dst}_{suffix}");
        let chosen = self.graph.free_name(&*self.edit, &base);
        if chosen != base {
            self.sink.emit(errors::name_disambiguated(&base, &chosen));
        }
        chosen
    }

    fn alloc(&mut self, node: Node) -> GraphResult<NodeId> {
        let name = node.name.clone();
        let kind = node.kind.name();
        let id = self.edit.alloc(node)?;
        let (src, dst) = self.endpoint_names();
        let edge = format!("{src} -> {dst}");
        self.inserted.push(InsertedConverter {
            id,
            name,
            kind,
            edge,
        });
        Ok(id)
    }

    fn clock_converter(&self, src_clock: String, dst_clock: String, width: Option<u32>) -> Node {
        let mut node = Node::new(
            self.converter_name("CDC"),
            NodeKind::ClockConverter {
                src_clock_domain: src_clock,
                dst_clock_domain: dst_clock,
            },
        );
        node.width = width;
        node
    }

    fn clock_only(&mut self, src_clock: String, dst_clock: String) -> GraphResult<()> {
        let width = self.edge.width;
        // An endpoint without a width never mismatches, so the converter must
        // not introduce one either.
        let cdc_width = match (self.check.src_width, self.check.dst_width) {
            (Some(_), Some(_)) => Some(width),
            _ => None,
        };
        let cdc = self.clock_converter(src_clock, dst_clock, cdc_width);
        let cdc = self.alloc(cdc)?;

        let [first, second] = split_latency_two(self.edge.latency);
        let edge = self.edge;
        self.edit.edges.push(edge.hop(edge.src, cdc, width, first));
        self.edit.edges.push(edge.hop(cdc, edge.dst, width, second));
        Ok(())
    }

    fn width_only(&mut self) -> GraphResult<()> {
        let src_width = self.check.src_width.unwrap_or(self.edge.width);
        let dst_width = self.check.dst_width.unwrap_or(self.edge.width);
        let src_clock = self.graph.clock_domain(self.edge.src);
        let dst_clock = self.graph.clock_domain(self.edge.dst);

        let mut wc = Node::new(
            self.converter_name("WC"),
            NodeKind::WidthConverter {
                src_width,
                dst_width,
            },
        );
        wc.clock_domain = src_clock.or(dst_clock).map(str::to_string);
        let wc = self.alloc(wc)?;

        let [first, second] = split_latency_two(self.edge.latency);
        let edge = self.edge;
        self.edit.edges.push(edge.hop(edge.src, wc, src_width, first));
        self.edit.edges.push(edge.hop(wc, edge.dst, dst_width, second));
        Ok(())
    }

    fn clock_then_width(&mut self, src_clock: String, dst_clock: String) -> GraphResult<()> {
        let src_width = self.check.src_width.unwrap_or(self.edge.width);
        let dst_width = self.check.dst_width.unwrap_or(self.edge.width);

        let cdc = self.clock_converter(src_clock, dst_clock.clone(), Some(src_width));
        let cdc = self.alloc(cdc)?;
        let wc = Node::new(
            self.converter_name("WC"),
            NodeKind::WidthConverter {
                src_width,
                dst_width,
            },
        )
        .with_clock_domain(dst_clock);
        let wc = self.alloc(wc)?;

        let [first, second, third] = split_latency_three(self.edge.latency);
        let edge = self.edge;
        self.edit.edges.push(edge.hop(edge.src, cdc, src_width, first));
        self.edit.edges.push(edge.hop(cdc, wc, src_width, second));
        self.edit.edges.push(edge.hop(wc, edge.dst, dst_width, third));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{C001, C003, C004};

    fn adapter(name: &str, clock: &str, width: u32) -> Node {
        Node::new(name, NodeKind::InterfaceAdapter)
            .with_clock_domain(clock)
            .with_width(width)
    }

    fn switch(clock: &str, width: u32) -> Node {
        Node::new("Crossbar", NodeKind::Switch { port_count: 2 })
            .with_clock_domain(clock)
            .with_width(width)
    }

    fn two_nodes(a: Node, b: Node, width: u32, latency: u32) -> (Graph, NodeId, NodeId) {
        let mut g = Graph::new();
        let a = g.add_node(a).unwrap();
        let b = g.add_node(b).unwrap();
        g.add_edge(Edge::new(a, b, width, latency)).unwrap();
        (g, a, b)
    }

    #[test]
    fn clock_crossing_becomes_two_hops() {
        let (mut g, a, b) = two_nodes(adapter("CPU0_adapter", "fast", 64), switch("slow", 64), 64, 6);
        let sink = DiagnosticSink::new();
        let report = insert_converters(&mut g, &sink).unwrap();

        assert_eq!(report.inserted.len(), 1);
        let cdc = &report.inserted[0];
        assert_eq!(cdc.name, "CPU0_adapter_Crossbar_CDC");
        assert_eq!(cdc.kind, "ClockConverter");
        assert_eq!(cdc.id.as_raw(), 2);

        let edges = g.edges();
        assert_eq!(edges.len(), 2);
        assert_eq!((edges[0].src, edges[0].dst), (a, cdc.id));
        assert_eq!((edges[1].src, edges[1].dst), (cdc.id, b));
        assert_eq!((edges[0].latency, edges[1].latency), (3, 3));
        assert!(edges.iter().all(|e| e.width == 64));
        assert!(!g.kind_counts().contains_key("WidthConverter"));

        let node = g.node(cdc.id).unwrap();
        assert_eq!(
            node.kind,
            NodeKind::ClockConverter {
                src_clock_domain: "fast".into(),
                dst_clock_domain: "slow".into(),
            }
        );
        assert_eq!(sink.with_code(C001).len(), 1);
    }

    #[test]
    fn clock_and_width_become_three_hops() {
        let (mut g, a, b) = two_nodes(adapter("DMA", "fast", 256), switch("slow", 64), 256, 10);
        let report = insert_converters(&mut g, &DiagnosticSink::new()).unwrap();

        let names: Vec<_> = report.inserted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["DMA_Crossbar_CDC", "DMA_Crossbar_WC"]);
        let (cdc, wc) = (report.inserted[0].id, report.inserted[1].id);
        assert!(cdc < wc);

        let hops: Vec<_> = g.edges().iter().map(|e| (e.src, e.dst, e.width, e.latency)).collect();
        assert_eq!(
            hops,
            vec![(a, cdc, 256, 3), (cdc, wc, 256, 3), (wc, b, 64, 4)]
        );
        let wc_node = g.node(wc).unwrap();
        assert_eq!(
            wc_node.kind,
            NodeKind::WidthConverter {
                src_width: 256,
                dst_width: 64
            }
        );
        assert_eq!(wc_node.clock_domain.as_deref(), Some("slow"));
    }

    #[test]
    fn width_only_uses_one_converter() {
        let (mut g, a, b) = two_nodes(adapter("a", "fast", 64), adapter("b", "fast", 128), 64, 4);
        let report = insert_converters(&mut g, &DiagnosticSink::new()).unwrap();
        assert_eq!(report.inserted.len(), 1);
        let wc = report.inserted[0].id;
        let node = g.node(wc).unwrap();
        assert_eq!(node.name, "a_b_WC");
        assert_eq!(node.clock_domain.as_deref(), Some("fast"));
        let hops: Vec<_> = g.edges().iter().map(|e| (e.src, e.dst, e.width, e.latency)).collect();
        assert_eq!(hops, vec![(a, wc, 64, 2), (wc, b, 128, 2)]);
    }

    #[test]
    fn matching_edge_untouched() {
        let (mut g, _, _) = two_nodes(adapter("a", "fast", 64), adapter("b", "fast", 64), 64, 5);
        let before = g.edges().to_vec();
        let report = insert_converters(&mut g, &DiagnosticSink::new()).unwrap();
        assert!(report.is_empty());
        assert_eq!(g.edges(), &before[..]);
    }

    #[test]
    fn unresolved_edge_passes_through() {
        let json = r#"{
            "network": "n", "num_nodes": 2,
            "nodes": [
                {"id": 0, "kind": "InterfaceAdapter", "name": "a", "width": 64, "clock_domain": "fast"},
                {"id": 1, "kind": "InterfaceAdapter", "name": "b", "width": 64, "clock_domain": "slow"}
            ],
            "graph": {"edges": [
                {"src": 0, "dst": 42, "width": 64, "latency": 2},
                {"src": 0, "dst": 1, "width": 64, "latency": 2}
            ]}
        }"#;
        let mut g = tessera_graph::load_topology_str(json, &DiagnosticSink::new()).unwrap();

        let sink = DiagnosticSink::new();
        let report = insert_converters(&mut g, &sink).unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].index, 0);
        assert_eq!(report.skipped[0].dst, NodeId::from_raw(42));
        assert_eq!(report.inserted.len(), 1);
        assert_eq!(g.edges()[0].dst, NodeId::from_raw(42));
        assert_eq!(sink.with_code(C004).len(), 1);
        assert!(!sink.has_errors());
    }

    #[test]
    fn second_run_inserts_nothing() {
        let mut g = Graph::new();
        let cpu = g.add_node(adapter("cpu", "fast", 256)).unwrap();
        let sw = g.add_node(switch("slow", 64)).unwrap();
        let mem = g.add_node(adapter("mem", "slow", 128)).unwrap();
        let io = g.add_node(adapter("io", "fast", 64)).unwrap();
        g.add_edge(Edge::new(cpu, sw, 256, 9)).unwrap();
        g.add_edge(Edge::new(sw, mem, 64, 4)).unwrap();
        g.add_edge(Edge::new(sw, io, 64, 2)).unwrap();

        let first = insert_converters(&mut g, &DiagnosticSink::new()).unwrap();
        assert_eq!(first.inserted.len(), 4);
        let nodes = g.node_count();
        let edges = g.edge_count();

        let second = insert_converters(&mut g, &DiagnosticSink::new()).unwrap();
        assert!(second.is_empty());
        assert_eq!(g.node_count(), nodes);
        assert_eq!(g.edge_count(), edges);
    }

    #[test]
    fn clock_split_beside_unsized_endpoint_is_stable() {
        let (mut g, a, b) = two_nodes(
            Node::new("a", NodeKind::InterfaceAdapter).with_clock_domain("fast"),
            adapter("b", "slow", 128),
            64,
            6,
        );
        let first = insert_converters(&mut g, &DiagnosticSink::new()).unwrap();
        let names: Vec<_> = first.inserted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a_b_CDC"]);
        let cdc = first.inserted[0].id;
        assert_eq!(g.node(cdc).unwrap().width, None);
        let hops: Vec<_> = g.edges().iter().map(|e| (e.src, e.dst, e.width)).collect();
        assert_eq!(hops, vec![(a, cdc, 64), (cdc, b, 64)]);

        let second = insert_converters(&mut g, &DiagnosticSink::new()).unwrap();
        assert!(second.is_empty());
        assert_eq!(g.node_count(), 3);
    }

    #[test]
    fn parallel_edges_get_distinct_names() {
        let (mut g, a, b) = two_nodes(adapter("a", "fast", 64), adapter("b", "slow", 64), 64, 2);
        g.add_edge(Edge::new(a, b, 64, 2)).unwrap();
        let sink = DiagnosticSink::new();
        let report = insert_converters(&mut g, &sink).unwrap();
        let names: Vec<_> = report.inserted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a_b_CDC", "a_b_CDC_1"]);
        assert_eq!(sink.with_code(C003).len(), 1);
    }

    #[test]
    fn converter_name_avoids_existing_nodes() {
        let (mut g, _, _) = two_nodes(adapter("a", "fast", 64), adapter("b", "slow", 64), 64, 2);
        g.add_node(Node::new("a_b_CDC", NodeKind::InterfaceAdapter))
            .unwrap();
        let report = insert_converters(&mut g, &DiagnosticSink::new()).unwrap();
        assert_eq!(report.inserted[0].name, "a_b_CDC_1");
    }

    #[test]
    fn ids_allocated_above_sparse_maximum() {
        let mut g = Graph::new();
        g.add_node_with_id(NodeId::from_raw(40), adapter("a", "fast", 64))
            .unwrap();
        g.add_node_with_id(NodeId::from_raw(7), adapter("b", "slow", 64))
            .unwrap();
        g.add_edge(Edge::new(NodeId::from_raw(40), NodeId::from_raw(7), 64, 2))
            .unwrap();
        let report = insert_converters(&mut g, &DiagnosticSink::new()).unwrap();
        assert_eq!(report.inserted[0].id.as_raw(), 41);
    }

    #[test]
    fn extras_survive_the_split() {
        let (mut g, _, _) = two_nodes(adapter("a", "fast", 64), adapter("b", "slow", 64), 64, 4);
        let mut edit = g.stage();
        edit.edges[0].extra.insert("vc".into(), 1.into());
        g.commit(edit).unwrap();
        insert_converters(&mut g, &DiagnosticSink::new()).unwrap();
        assert!(g.edges().iter().all(|e| e.extra["vc"] == 1));
    }
}
