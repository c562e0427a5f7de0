//! End-to-end tests: specification → crossbar → bandwidth pass → converters.
//!
//! These check the structural guarantees of a resolved graph rather than
//! exact node counts.

use tessera_bridge::insert_converters;
use tessera_config::{load_spec_from_str, SpecDocument};
use tessera_diagnostics::DiagnosticSink;
use tessera_gen::{generate_crossbar, optimize_bandwidth, CrossbarTopology, FlowPlacement};
use tessera_graph::{Graph, NodeId, NodeKind};

const SOC: &str = r#"
[[sources]]
name = "CPU0"
kind = "CPU"
avg_throughput = 6.0
max_throughput = 12.0
latency_requirement = 40
priority = 3

[[sources]]
name = "GPU"
kind = "GPU"
avg_throughput = 50.0
max_throughput = 90.0
latency_requirement = 100
priority = 2

[[sources]]
name = "UART"
kind = "UART"
avg_throughput = 0.01
max_throughput = 0.05
latency_requirement = 500
priority = 0

[[sources]]
name = "AUDIO"
kind = "DSP"
avg_throughput = 0.5
max_throughput = 1.5
latency_requirement = 200
priority = 1

[[targets]]
name = "DDR0"
kind = "DDR"
max_bandwidth = 102.4
latency = 120
size = 8.0

[[targets]]
name = "SRAM"
kind = "SRAM"
max_bandwidth = 8.0
latency = 8
size = 0.25

[[targets]]
name = "PERIPH"
kind = "APB"
max_bandwidth = 1.0
latency = 30
size = 0.01

[[traffic_flows]]
src = "GPU"
dst = "DDR0"
bandwidth = 64.0
max_latency = 150

[[traffic_flows]]
src = "CPU0"
dst = "DDR0"
bandwidth = 10.0
max_latency = 60

[[traffic_flows]]
src = "CPU0"
dst = "SRAM"
bandwidth = 2.0
max_latency = 20

[[traffic_flows]]
src = "UART"
dst = "PERIPH"
bandwidth = 0.01
max_latency = 400

[[traffic_flows]]
src = "AUDIO"
dst = "SRAM"
bandwidth = 0.8
max_latency = 100

[constraints]
default_frequency = "2GHz"

[[constraints.clock_domains]]
name = "fast"
frequency = 2000

[[constraints.clock_domains]]
name = "slow"
frequency = 400
"#;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn spec() -> SpecDocument {
    load_spec_from_str(SOC).expect("valid specification")
}

fn resolved(spec: &SpecDocument) -> CrossbarTopology {
    let sink = DiagnosticSink::new();
    let mut topo = generate_crossbar(spec).expect("generation succeeds");
    optimize_bandwidth(&mut topo, spec, &sink).expect("bandwidth pass succeeds");
    insert_converters(&mut topo.graph, &sink).expect("insertion succeeds");
    assert!(!sink.has_errors());
    topo
}

fn is_converter(graph: &Graph, id: NodeId) -> bool {
    graph.node(id).is_some_and(|n| n.kind.is_converter())
}

/// Checks clock and width agreement on every edge without a converter end.
fn assert_structurally_valid(graph: &Graph) {
    for edge in graph.edges() {
        if is_converter(graph, edge.src) || is_converter(graph, edge.dst) {
            continue;
        }
        let src = graph.node(edge.src).expect("edge source exists");
        let dst = graph.node(edge.dst).expect("edge target exists");
        if let (Some(a), Some(b)) = (&src.clock_domain, &dst.clock_domain) {
            assert_eq!(a, b, "clock mismatch on {} -> {}", src.name, dst.name);
        }
        if let (Some(a), Some(b)) = (src.resolved_width(), dst.resolved_width()) {
            assert_eq!(edge.width, a, "width mismatch at {}", src.name);
            assert_eq!(edge.width, b, "width mismatch at {}", dst.name);
        }
    }
}

/// Returns `true` if `to` is reachable from `from` along directed edges.
fn reaches(graph: &Graph, from: NodeId, to: NodeId) -> bool {
    let mut seen = vec![from];
    let mut stack = vec![from];
    while let Some(id) = stack.pop() {
        if id == to {
            return true;
        }
        for edge in graph.edges().iter().filter(|e| e.src == id) {
            if !seen.contains(&edge.dst) {
                seen.push(edge.dst);
                stack.push(edge.dst);
            }
        }
    }
    false
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn resolved_graph_has_no_adjacent_mismatch() {
    let topo = resolved(&spec());
    assert_structurally_valid(&topo.graph);
    assert!(topo.graph.kind_counts().contains_key("ClockConverter"));
}

#[test]
fn converter_insertion_is_idempotent_on_pipeline_output() {
    let mut topo = resolved(&spec());
    let nodes = topo.graph.node_count();
    let report = insert_converters(&mut topo.graph, &DiagnosticSink::new()).unwrap();
    assert!(report.is_empty());
    assert_eq!(topo.graph.node_count(), nodes);
}

#[test]
fn every_declared_flow_stays_reachable() {
    let spec = spec();
    let topo = resolved(&spec);
    for flow in &spec.traffic_flows {
        let src = topo.graph.id_of(&flow.src).unwrap();
        let dst = topo.graph.id_of(&flow.dst).unwrap();
        assert!(reaches(&topo.graph, src, dst), "{} cannot reach {}", flow.src, flow.dst);
    }
}

#[test]
fn placements_follow_bandwidth_bands() {
    let spec = spec();
    let topo = resolved(&spec);
    for flow in &spec.traffic_flows {
        let placement = topo.placement(&flow.key()).unwrap();
        match placement {
            FlowPlacement::Dedicated { .. } => assert!(flow.bandwidth >= 50.0),
            FlowPlacement::Shared => assert!((5.0..50.0).contains(&flow.bandwidth)),
            FlowPlacement::Arbitrated { arbiter } => {
                assert!(flow.bandwidth < 5.0);
                let node = topo.graph.node(*arbiter).unwrap();
                assert!(matches!(node.kind, NodeKind::Arbiter { input_count } if input_count >= 1));
            }
        }
    }
}

#[test]
fn switch_port_count_tracks_incident_edges_before_bridging() {
    let spec = spec();
    let mut topo = generate_crossbar(&spec).unwrap();
    optimize_bandwidth(&mut topo, &spec, &DiagnosticSink::new()).unwrap();
    assert_eq!(
        topo.switch_ports() as usize,
        topo.graph.incident_edge_count(topo.switch)
    );
}

#[test]
fn converter_ids_are_above_generated_ids() {
    let spec = spec();
    let mut topo = generate_crossbar(&spec).unwrap();
    let sink = DiagnosticSink::new();
    optimize_bandwidth(&mut topo, &spec, &sink).unwrap();
    let first_free = topo.graph.next_id();
    let report = insert_converters(&mut topo.graph, &sink).unwrap();
    assert!(!report.inserted.is_empty());
    assert!(report.inserted.iter().all(|c| c.id >= first_free));
    let ids: Vec<_> = report.inserted.iter().map(|c| c.id.as_raw()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}

#[test]
fn exported_document_reloads_and_stays_resolved() {
    let spec = spec();
    let topo = resolved(&spec);
    let doc = topo.to_document("Irregular", &spec);
    let json = serde_json::to_string(&doc).unwrap();

    let sink = DiagnosticSink::new();
    let mut reloaded = tessera_graph::load_topology_str(&json, &sink).unwrap();
    assert_eq!(reloaded.node_count(), topo.graph.node_count());
    assert_eq!(reloaded.edge_count(), topo.graph.edge_count());
    assert_eq!(sink.warning_count(), 0);

    let report = insert_converters(&mut reloaded, &DiagnosticSink::new()).unwrap();
    assert!(report.is_empty());
}
