//! Bandwidth-driven refinement of a generated crossbar.
//!
//! Declared flows are summed per (source, target) key and sorted by
//! descending bandwidth. Each key then lands in one of three bands:
//!
//! - at least [`DEDICATED_THRESHOLD`] GB/s: a two-port router is inserted
//!   directly between the two adapters;
//! - between the two thresholds: the flow stays on the shared switch;
//! - below [`ARBITRATION_THRESHOLD`] GB/s: sources are batched per target
//!   behind arbiters of at most `max_arbiter_inputs` inputs, each feeding the
//!   switch.
//!
//! A shared-switch edge is removed only once no declared flow still needs it,
//! and an edge removed by an earlier run is put back when a flow added since
//! needs it again. Placed keys are remembered on the [`CrossbarTopology`], so
//! running the pass again places nothing twice.

use crate::crossbar::{CrossbarTopology, FlowPlacement, SWITCH_EDGE_LATENCY};
use crate::errors;
use std::collections::{BTreeMap, HashMap};
use tessera_common::{Flow, FlowKey};
use tessera_config::SpecDocument;
use tessera_diagnostics::DiagnosticSink;
use tessera_graph::{Edge, GraphResult, Node, NodeId, NodeKind};

/// Flows at or above this bandwidth get a dedicated router, in GB/s.
pub const DEDICATED_THRESHOLD: f64 = 50.0;

/// Flows below this bandwidth are arbitrated, in GB/s.
pub const ARBITRATION_THRESHOLD: f64 = 5.0;

/// Latency of each hop through a dedicated router or an arbiter.
pub const REFINEMENT_EDGE_LATENCY: u32 = 1;

/// The band a flow's aggregated bandwidth falls in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BandwidthClass {
    /// At least [`DEDICATED_THRESHOLD`].
    Dedicated,
    /// Between the thresholds.
    Shared,
    /// Below [`ARBITRATION_THRESHOLD`].
    Arbitrated,
}

impl BandwidthClass {
    /// Classifies an aggregated bandwidth in GB/s.
    pub fn of(bandwidth: f64) -> Self {
        if bandwidth >= DEDICATED_THRESHOLD {
            BandwidthClass::Dedicated
        } else if bandwidth >= ARBITRATION_THRESHOLD {
            BandwidthClass::Shared
        } else {
            BandwidthClass::Arbitrated
        }
    }
}

/// The total bandwidth declared for one key.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedFlow {
    /// The (source, target) key.
    pub key: FlowKey,
    /// Sum of the bandwidths of every flow with this key.
    pub bandwidth: f64,
    /// Number of declared flows summed.
    pub count: usize,
}

/// Sums flows per key, then sorts by descending bandwidth. Ties keep the
/// order in which keys first appear.
pub fn aggregate_flows(flows: &[Flow]) -> Vec<AggregatedFlow> {
    let mut index: HashMap<FlowKey, usize> = HashMap::new();
    let mut aggregated: Vec<AggregatedFlow> = Vec::new();
    for flow in flows {
        let key = flow.key();
        match index.get(&key) {
            Some(&slot) => {
                aggregated[slot].bandwidth += flow.bandwidth;
                aggregated[slot].count += 1;
            }
            None => {
                index.insert(key.clone(), aggregated.len());
                aggregated.push(AggregatedFlow {
                    key,
                    bandwidth: flow.bandwidth,
                    count: 1,
                });
            }
        }
    }
    aggregated.sort_by(|a, b| b.bandwidth.total_cmp(&a.bandwidth));
    aggregated
}

/// A dedicated router inserted for one flow.
#[derive(Clone, Debug, PartialEq)]
pub struct DedicatedPath {
    /// The flow it serves.
    pub key: FlowKey,
    /// Aggregated bandwidth of the flow.
    pub bandwidth: f64,
    /// The router node.
    pub router: NodeId,
    /// The router name.
    pub name: String,
}

/// An arbiter and the sources batched behind it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArbiterGroup {
    /// The arbiter node.
    pub arbiter: NodeId,
    /// The arbiter name.
    pub name: String,
    /// The target all batched flows go to.
    pub target: String,
    /// Batched sources, highest bandwidth first.
    pub sources: Vec<String>,
}

/// What one run of [`optimize_bandwidth`] did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BandwidthReport {
    /// Routers inserted by this run.
    pub dedicated: Vec<DedicatedPath>,
    /// Keys left on the shared switch by this run.
    pub shared: Vec<FlowKey>,
    /// Arbiters inserted by this run.
    pub arbiters: Vec<ArbiterGroup>,
    /// Keys summed from several declared flows.
    pub merged: Vec<FlowKey>,
    /// Keys placed by an earlier run and skipped.
    pub already_placed: Vec<FlowKey>,
    /// Keys naming an endpoint the topology does not have.
    pub unknown: Vec<FlowKey>,
    /// Shared-switch edges removed, as (from, to).
    pub removed_edges: Vec<(NodeId, NodeId)>,
    /// Shared-switch edges put back, as (from, to).
    pub restored_edges: Vec<(NodeId, NodeId)>,
    /// Switch port count before and after the run.
    pub switch_ports: (u32, u32),
}

impl BandwidthReport {
    /// Returns `true` if the run inserted, removed, or restored nothing.
    pub fn is_noop(&self) -> bool {
        self.dedicated.is_empty()
            && self.arbiters.is_empty()
            && self.removed_edges.is_empty()
            && self.restored_edges.is_empty()
    }
}

/// Refines `topo` according to the flows declared in `spec`.
pub fn optimize_bandwidth(
    topo: &mut CrossbarTopology,
    spec: &SpecDocument,
    sink: &DiagnosticSink,
) -> GraphResult<BandwidthReport> {
    let mut report = BandwidthReport::default();
    let aggregated = aggregate_flows(&spec.traffic_flows);

    let mut fresh = Vec::new();
    let mut declared = Vec::new();
    for flow in &aggregated {
        if flow.count > 1 {
            sink.emit(errors::flows_summed(&flow.key, flow.count, flow.bandwidth));
            report.merged.push(flow.key.clone());
        }
        let missing = [
            (&flow.key.src, topo.source_adapters.contains_key(&flow.key.src)),
            (&flow.key.dst, topo.target_adapters.contains_key(&flow.key.dst)),
        ]
        .into_iter()
        .find(|(_, known)| !known);
        if let Some((name, _)) = missing {
            tracing::warn!(flow = %flow.key, endpoint = %name, "flow endpoint not in topology");
            sink.emit(errors::unknown_endpoint(&flow.key, name));
            report.unknown.push(flow.key.clone());
            continue;
        }
        declared.push(flow.key.clone());
        if topo.placements.contains_key(&flow.key) {
            sink.emit(errors::already_optimized(&flow.key));
            report.already_placed.push(flow.key.clone());
        } else {
            fresh.push(flow);
        }
    }

    let graph = &topo.graph;
    let switch = topo.switch;
    let switch_width = graph.resolved_width(switch);
    let switch_clock = graph.clock_domain(switch).map(str::to_string);
    let mut edit = graph.stage();
    let mut placed: BTreeMap<FlowKey, FlowPlacement> = BTreeMap::new();
    let mut low: Vec<(String, Vec<String>)> = Vec::new();

    for flow in &fresh {
        let key = &flow.key;
        let src_adapter = topo.source_adapters[&key.src];
        let dst_adapter = topo.target_adapters[&key.dst];
        match BandwidthClass::of(flow.bandwidth) {
            BandwidthClass::Dedicated => {
                let width = graph.resolved_width(src_adapter).or(switch_width).unwrap_or_default();
                let name = graph.free_name(&edit, &format!("{}_{}_Router", key.src, key.dst));
                let mut router = Node::new(&name, NodeKind::Switch { port_count: 2 }).with_width(width);
                router.clock_domain = graph.clock_domain(src_adapter).map(str::to_string);
                let router = edit.alloc(router)?;
                edit.edges
                    .push(Edge::new(src_adapter, router, width, REFINEMENT_EDGE_LATENCY));
                edit.edges
                    .push(Edge::new(router, dst_adapter, width, REFINEMENT_EDGE_LATENCY));

                tracing::debug!(flow = %key, bandwidth = flow.bandwidth, router = %name, "dedicated path");
                sink.emit(errors::dedicated_router(&name, key, flow.bandwidth));
                placed.insert(key.clone(), FlowPlacement::Dedicated { router });
                report.dedicated.push(DedicatedPath {
                    key: key.clone(),
                    bandwidth: flow.bandwidth,
                    router,
                    name,
                });
            }
            BandwidthClass::Shared => {
                placed.insert(key.clone(), FlowPlacement::Shared);
                report.shared.push(key.clone());
            }
            BandwidthClass::Arbitrated => match low.iter_mut().find(|(dst, _)| *dst == key.dst) {
                Some((_, sources)) => sources.push(key.src.clone()),
                None => low.push((key.dst.clone(), vec![key.src.clone()])),
            },
        }
    }

    let batch = spec.constraints.max_arbiter_inputs.max(1);
    for (target, sources) in &low {
        for (n, chunk) in sources.chunks(batch).enumerate() {
            let name = graph.free_name(&edit, &format!("{target}_Arbiter_{n}"));
            let input_count = u32::try_from(chunk.len()).unwrap_or(u32::MAX);
            let mut arbiter = Node::new(&name, NodeKind::Arbiter { input_count });
            arbiter.width = switch_width;
            arbiter.clock_domain = switch_clock.clone();
            let arbiter = edit.alloc(arbiter)?;

            for source in chunk {
                let adapter = topo.source_adapters[source];
                let width = graph.resolved_width(adapter).or(switch_width).unwrap_or_default();
                edit.edges
                    .push(Edge::new(adapter, arbiter, width, REFINEMENT_EDGE_LATENCY));
                placed.insert(
                    FlowKey::new(source, target),
                    FlowPlacement::Arbitrated { arbiter },
                );
            }
            edit.edges.push(Edge::new(
                arbiter,
                switch,
                switch_width.unwrap_or_default(),
                REFINEMENT_EDGE_LATENCY,
            ));

            tracing::debug!(arbiter = %name, target = %target, inputs = chunk.len(), "arbiter batch");
            sink.emit(errors::arbiter_inserted(&name, chunk));
            report.arbiters.push(ArbiterGroup {
                arbiter,
                name,
                target: target.clone(),
                sources: chunk.to_vec(),
            });
        }
    }

    // A switch edge goes only when every declared flow through it is served
    // elsewhere: arbitrated sources still reach the switch via their arbiter.
    let placement = |key: &FlowKey| placed.get(key).or_else(|| topo.placements.get(key));
    let mut detached = Vec::new();
    for (source, &adapter) in &topo.source_adapters {
        let mut flows = declared.iter().filter(|k| &k.src == source).peekable();
        if flows.peek().is_some()
            && flows.all(|k| {
                matches!(
                    placement(k),
                    Some(FlowPlacement::Dedicated { .. } | FlowPlacement::Arbitrated { .. })
                )
            })
        {
            detached.push((adapter, switch));
        }
    }
    for (target, &adapter) in &topo.target_adapters {
        let mut flows = declared.iter().filter(|k| &k.dst == target).peekable();
        if flows.peek().is_some()
            && flows.all(|k| matches!(placement(k), Some(FlowPlacement::Dedicated { .. })))
        {
            detached.push((switch, adapter));
        }
    }
    edit.edges.retain(|e| {
        let remove = detached.contains(&(e.src, e.dst));
        if remove {
            report.removed_edges.push((e.src, e.dst));
        }
        !remove
    });
    for (src, dst) in &report.removed_edges {
        let label = format!("{} -> {}", node_name(topo, *src), node_name(topo, *dst));
        sink.emit(errors::switch_edge_removed(&label));
    }

    // Shared flows need both adapters on the switch; arbitrated flows need
    // the target side only.
    let mut needed: Vec<((NodeId, NodeId), &FlowKey)> = Vec::new();
    for key in &declared {
        let src_adapter = topo.source_adapters[&key.src];
        let dst_adapter = topo.target_adapters[&key.dst];
        match placement(key) {
            Some(FlowPlacement::Shared) => {
                needed.push(((src_adapter, switch), key));
                needed.push(((switch, dst_adapter), key));
            }
            Some(FlowPlacement::Arbitrated { .. }) => needed.push(((switch, dst_adapter), key)),
            _ => {}
        }
    }
    for ((src, dst), key) in needed {
        let present = edit.edges.iter().any(|e| e.src == src && e.dst == dst);
        if present || detached.contains(&(src, dst)) {
            continue;
        }
        let adapter = if src == switch { dst } else { src };
        let width = graph.resolved_width(adapter).or(switch_width).unwrap_or_default();
        edit.edges.push(Edge::new(src, dst, width, SWITCH_EDGE_LATENCY));
        report.restored_edges.push((src, dst));

        let label = format!("{} -> {}", node_name(topo, src), node_name(topo, dst));
        tracing::debug!(edge = %label, flow = %key, "restored switch edge");
        sink.emit(errors::switch_edge_restored(&label, key));
    }

    let before = topo.switch_ports();
    topo.graph.commit(edit)?;
    topo.placements.extend(placed);

    let after = u32::try_from(topo.graph.incident_edge_count(switch)).unwrap_or(u32::MAX);
    if let Some(NodeKind::Switch { port_count }) = topo.graph.kind_mut(switch) {
        *port_count = after;
    }
    if before != after {
        sink.emit(errors::ports_recomputed(
            &node_name(topo, switch),
            before,
            after,
        ));
    }
    report.switch_ports = (before, after);

    tracing::info!(
        dedicated = report.dedicated.len(),
        shared = report.shared.len(),
        arbiters = report.arbiters.len(),
        removed_edges = report.removed_edges.len(),
        restored_edges = report.restored_edges.len(),
        already_placed = report.already_placed.len(),
        switch_ports = after,
        "bandwidth optimization complete"
    );
    Ok(report)
}

fn node_name(topo: &CrossbarTopology, id: NodeId) -> String {
    topo.graph
        .node(id)
        .map_or_else(|| id.to_string(), |n| n.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossbar::generate_crossbar;
    use crate::errors::{G005, G006, G007, G008};
    use tessera_config::load_spec_from_str;

    const SPEC: &str = r#"
[[sources]]
name = "GPU"
avg_throughput = 60.0
max_throughput = 80.0

[[sources]]
name = "CPU0"
avg_throughput = 8.0
max_throughput = 12.0

[[sources]]
name = "UART"
avg_throughput = 0.1
max_throughput = 0.2

[[sources]]
name = "I2C"
avg_throughput = 0.1
max_throughput = 0.2

[[sources]]
name = "SPI"
avg_throughput = 0.1
max_throughput = 0.2

[[targets]]
name = "DDR0"
max_bandwidth = 100.0
latency = 100

[[targets]]
name = "PERIPH"
max_bandwidth = 2.0
latency = 20

[[traffic_flows]]
src = "GPU"
dst = "DDR0"
bandwidth = 60.0
max_latency = 100

[[traffic_flows]]
src = "CPU0"
dst = "DDR0"
bandwidth = 10.0
max_latency = 50

[[traffic_flows]]
src = "UART"
dst = "PERIPH"
bandwidth = 0.5
max_latency = 200

[[traffic_flows]]
src = "I2C"
dst = "PERIPH"
bandwidth = 0.2
max_latency = 200

[[traffic_flows]]
src = "SPI"
dst = "PERIPH"
bandwidth = 1.0
max_latency = 200

[constraints]
max_arbiter_inputs = 2
"#;

    fn setup() -> (SpecDocument, CrossbarTopology) {
        let spec = load_spec_from_str(SPEC).unwrap();
        let topo = generate_crossbar(&spec).unwrap();
        (spec, topo)
    }

    fn has_edge(topo: &CrossbarTopology, src: NodeId, dst: NodeId) -> bool {
        topo.graph.edges().iter().any(|e| e.src == src && e.dst == dst)
    }

    #[test]
    fn aggregation_sums_and_sorts() {
        let flows = vec![
            Flow::new("a", "x", 3.0, 10),
            Flow::new("b", "x", 20.0, 10),
            Flow::new("a", "x", 4.0, 10),
            Flow::new("c", "y", 7.0, 10),
        ];
        let agg = aggregate_flows(&flows);
        let keys: Vec<_> = agg.iter().map(|f| (f.key.src.as_str(), f.bandwidth)).collect();
        // a->x (7.0) ties with c->y (7.0) and appeared first
        assert_eq!(keys, vec![("b", 20.0), ("a", 7.0), ("c", 7.0)]);
        assert_eq!(agg[1].count, 2);
    }

    #[test]
    fn classification_bands() {
        assert_eq!(BandwidthClass::of(50.0), BandwidthClass::Dedicated);
        assert_eq!(BandwidthClass::of(49.9), BandwidthClass::Shared);
        assert_eq!(BandwidthClass::of(5.0), BandwidthClass::Shared);
        assert_eq!(BandwidthClass::of(4.99), BandwidthClass::Arbitrated);
    }

    #[test]
    fn high_bandwidth_flow_gets_dedicated_router() {
        let (spec, mut topo) = setup();
        let report = optimize_bandwidth(&mut topo, &spec, &DiagnosticSink::new()).unwrap();

        assert_eq!(report.dedicated.len(), 1);
        let path = &report.dedicated[0];
        assert_eq!(path.name, "GPU_DDR0_Router");
        let gpu = topo.source_adapters["GPU"];
        let ddr = topo.target_adapters["DDR0"];
        assert!(has_edge(&topo, gpu, path.router));
        assert!(has_edge(&topo, path.router, ddr));
        assert_eq!(
            topo.graph.node(path.router).unwrap().kind,
            NodeKind::Switch { port_count: 2 }
        );
        // GPU has no other flow, so its switch edge is gone.
        assert!(!has_edge(&topo, gpu, topo.switch));
        // DDR0 still serves CPU0 through the switch.
        assert!(has_edge(&topo, topo.switch, ddr));
        assert!(matches!(
            topo.placement(&FlowKey::new("GPU", "DDR0")),
            Some(FlowPlacement::Dedicated { .. })
        ));
    }

    #[test]
    fn medium_flow_stays_shared() {
        let (spec, mut topo) = setup();
        let report = optimize_bandwidth(&mut topo, &spec, &DiagnosticSink::new()).unwrap();
        assert_eq!(report.shared, vec![FlowKey::new("CPU0", "DDR0")]);
        assert!(has_edge(&topo, topo.source_adapters["CPU0"], topo.switch));
        assert_eq!(
            topo.placement(&FlowKey::new("CPU0", "DDR0")),
            Some(&FlowPlacement::Shared)
        );
    }

    #[test]
    fn low_flows_batched_per_target() {
        let (spec, mut topo) = setup();
        let report = optimize_bandwidth(&mut topo, &spec, &DiagnosticSink::new()).unwrap();

        assert_eq!(report.arbiters.len(), 2);
        let first = &report.arbiters[0];
        assert_eq!(first.name, "PERIPH_Arbiter_0");
        assert_eq!(first.target, "PERIPH");
        // highest bandwidth first: SPI 1.0, UART 0.5, I2C 0.2
        assert_eq!(first.sources, vec!["SPI".to_string(), "UART".to_string()]);
        assert_eq!(report.arbiters[1].sources, vec!["I2C".to_string()]);
        assert_eq!(
            topo.graph.node(first.arbiter).unwrap().kind,
            NodeKind::Arbiter { input_count: 2 }
        );

        for group in &report.arbiters {
            assert!(has_edge(&topo, group.arbiter, topo.switch));
            for source in &group.sources {
                let adapter = topo.source_adapters[source];
                assert!(has_edge(&topo, adapter, group.arbiter));
                assert!(!has_edge(&topo, adapter, topo.switch));
            }
        }
        // PERIPH is reached through the switch by arbitrated flows.
        assert!(has_edge(&topo, topo.switch, topo.target_adapters["PERIPH"]));
    }

    #[test]
    fn port_count_matches_incident_edges() {
        let (spec, mut topo) = setup();
        let report = optimize_bandwidth(&mut topo, &spec, &DiagnosticSink::new()).unwrap();
        let incident = topo.graph.incident_edge_count(topo.switch) as u32;
        assert_eq!(topo.switch_ports(), incident);
        // 7 original, minus GPU/UART/I2C/SPI inputs, plus two arbiter outputs
        assert_eq!(report.switch_ports, (7, 5));
    }

    #[test]
    fn second_run_changes_nothing() {
        let (spec, mut topo) = setup();
        optimize_bandwidth(&mut topo, &spec, &DiagnosticSink::new()).unwrap();
        let nodes = topo.graph.node_count();
        let edges = topo.graph.edge_count();

        let sink = DiagnosticSink::new();
        let again = optimize_bandwidth(&mut topo, &spec, &sink).unwrap();
        assert!(again.is_noop());
        assert_eq!(again.already_placed.len(), 5);
        assert_eq!(topo.graph.node_count(), nodes);
        assert_eq!(topo.graph.edge_count(), edges);
        assert_eq!(sink.with_code(G006).len(), 5);
    }

    #[test]
    fn flow_added_later_gets_its_switch_edge_back() {
        let (mut spec, mut topo) = setup();
        optimize_bandwidth(&mut topo, &spec, &DiagnosticSink::new()).unwrap();
        let gpu = topo.source_adapters["GPU"];
        assert!(!has_edge(&topo, gpu, topo.switch));

        spec.traffic_flows.push(Flow::new("GPU", "PERIPH", 10.0, 80));
        let sink = DiagnosticSink::new();
        let report = optimize_bandwidth(&mut topo, &spec, &sink).unwrap();

        assert_eq!(report.shared, vec![FlowKey::new("GPU", "PERIPH")]);
        assert_eq!(report.restored_edges, vec![(gpu, topo.switch)]);
        assert!(has_edge(&topo, gpu, topo.switch));
        assert!(!report.is_noop());
        assert_eq!(sink.with_code(G008).len(), 1);
        assert_eq!(
            topo.switch_ports(),
            topo.graph.incident_edge_count(topo.switch) as u32
        );
        assert_eq!(report.switch_ports, (5, 6));

        let again = optimize_bandwidth(&mut topo, &spec, &DiagnosticSink::new()).unwrap();
        assert!(again.is_noop());
    }

    #[test]
    fn target_edge_restored_for_later_shared_flow() {
        let (mut spec, mut topo) = setup();
        spec.traffic_flows.retain(|f| f.dst != "DDR0" || f.src == "GPU");
        optimize_bandwidth(&mut topo, &spec, &DiagnosticSink::new()).unwrap();
        let ddr = topo.target_adapters["DDR0"];
        assert!(!has_edge(&topo, topo.switch, ddr));

        spec.traffic_flows.push(Flow::new("CPU0", "DDR0", 10.0, 50));
        let report = optimize_bandwidth(&mut topo, &spec, &DiagnosticSink::new()).unwrap();
        assert_eq!(report.restored_edges, vec![(topo.switch, ddr)]);
        assert!(has_edge(&topo, topo.source_adapters["CPU0"], topo.switch));
        assert!(has_edge(&topo, topo.switch, ddr));
    }

    #[test]
    fn duplicate_keys_are_summed() {
        let (mut spec, mut topo) = setup();
        // 10 + 45 crosses the dedicated threshold.
        spec.traffic_flows.push(Flow::new("CPU0", "DDR0", 45.0, 40));
        let sink = DiagnosticSink::new();
        let report = optimize_bandwidth(&mut topo, &spec, &sink).unwrap();
        assert_eq!(report.merged, vec![FlowKey::new("CPU0", "DDR0")]);
        assert_eq!(report.dedicated.len(), 2);
        assert_eq!(sink.with_code(G005).len(), 1);
        // Every flow into DDR0 is dedicated now.
        assert!(!has_edge(&topo, topo.switch, topo.target_adapters["DDR0"]));
    }

    #[test]
    fn unknown_endpoint_is_reported() {
        let (mut spec, mut topo) = setup();
        spec.traffic_flows.push(Flow::new("GHOST", "DDR0", 1.0, 10));
        let sink = DiagnosticSink::new();
        let report = optimize_bandwidth(&mut topo, &spec, &sink).unwrap();
        assert_eq!(report.unknown, vec![FlowKey::new("GHOST", "DDR0")]);
        assert_eq!(sink.with_code(G007).len(), 1);
        assert!(topo.placement(&FlowKey::new("GHOST", "DDR0")).is_none());
    }

    #[test]
    fn sources_without_flows_keep_their_switch_edge() {
        let (mut spec, mut topo) = setup();
        spec.traffic_flows.retain(|f| f.src != "I2C");
        optimize_bandwidth(&mut topo, &spec, &DiagnosticSink::new()).unwrap();
        assert!(has_edge(&topo, topo.source_adapters["I2C"], topo.switch));
    }
}
