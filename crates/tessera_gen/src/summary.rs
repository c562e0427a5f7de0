//! Generation summary and topology-document export.

use crate::crossbar::{CrossbarTopology, FlowPlacement};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tessera_config::SpecDocument;
use tessera_graph::{BandwidthAllocation, TopologyConstraints, TopologyDocument};

/// End-to-end latency bound exported when no flow is declared.
pub const DEFAULT_MAX_END_TO_END_LATENCY: u32 = 200;

/// Aggregate figures describing a generated topology.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopologySummary {
    /// Node count per kind name.
    pub kind_counts: BTreeMap<String, usize>,
    /// Total edge count.
    pub edge_count: usize,
    /// Number of declared sources.
    pub source_count: usize,
    /// Number of declared targets.
    pub target_count: usize,
    /// Sum of declared flow bandwidths in GB/s.
    pub required_bandwidth: f64,
    /// Sum of target peak bandwidths in GB/s.
    pub target_capacity: f64,
    /// Required bandwidth as a percentage of capacity, if any capacity exists.
    pub utilization_percent: Option<f64>,
    /// Flows served by dedicated routers.
    pub dedicated_paths: usize,
    /// Flows left on the shared switch.
    pub shared_flows: usize,
    /// Flows behind arbiters.
    pub arbitrated_flows: usize,
}

impl CrossbarTopology {
    /// Summarizes the topology against the specification it came from.
    pub fn summary(&self, spec: &SpecDocument) -> TopologySummary {
        let kind_counts = self
            .graph
            .kind_counts()
            .into_iter()
            .map(|(kind, count)| (kind.to_string(), count))
            .collect();
        let required_bandwidth: f64 = spec.traffic_flows.iter().map(|f| f.bandwidth).sum();
        let target_capacity: f64 = spec.targets.iter().map(|t| t.max_bandwidth).sum();
        let utilization_percent =
            (target_capacity > 0.0).then(|| required_bandwidth / target_capacity * 100.0);

        let mut dedicated_paths = 0;
        let mut shared_flows = 0;
        let mut arbitrated_flows = 0;
        for (_, placement) in self.placements() {
            match placement {
                FlowPlacement::Dedicated { .. } => dedicated_paths += 1,
                FlowPlacement::Shared => shared_flows += 1,
                FlowPlacement::Arbitrated { .. } => arbitrated_flows += 1,
            }
        }

        TopologySummary {
            kind_counts,
            edge_count: self.graph.edge_count(),
            source_count: spec.sources.len(),
            target_count: spec.targets.len(),
            required_bandwidth,
            target_capacity,
            utilization_percent,
            dedicated_paths,
            shared_flows,
            arbitrated_flows,
        }
    }

    /// Exports the topology as a document for downstream tools.
    pub fn to_document(&self, network: &str, spec: &SpecDocument) -> TopologyDocument {
        let constraints = TopologyConstraints {
            niu_entry_only: false,
            clock_domains: spec.constraints.clock_domains.clone(),
            enforce_width_match: false,
            max_end_to_end_latency: spec
                .max_flow_latency()
                .unwrap_or(DEFAULT_MAX_END_TO_END_LATENCY),
            bandwidth_allocation: spec
                .traffic_flows
                .iter()
                .map(|f| BandwidthAllocation {
                    source: f.src.clone(),
                    target: f.dst.clone(),
                    guaranteed_bw: f.bandwidth,
                    max_latency: f.max_latency,
                    priority: f.priority,
                })
                .collect(),
            validate_bandwidth: true,
            validate_latency: true,
        };
        self.graph.to_document(network, constraints)
    }
}

impl fmt::Display for TopologySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Node kinds:")?;
        for (kind, count) in &self.kind_counts {
            writeln!(f, "  {kind:20}: {count:3}")?;
        }
        writeln!(f, "Connectivity:")?;
        writeln!(f, "  edges: {}", self.edge_count)?;
        writeln!(
            f,
            "  sources x targets: {} x {}",
            self.source_count, self.target_count
        )?;
        writeln!(
            f,
            "  dedicated / shared / arbitrated flows: {} / {} / {}",
            self.dedicated_paths, self.shared_flows, self.arbitrated_flows
        )?;
        writeln!(f, "Bandwidth:")?;
        writeln!(f, "  required: {:.1} GB/s", self.required_bandwidth)?;
        writeln!(f, "  capacity: {:.1} GB/s", self.target_capacity)?;
        match self.utilization_percent {
            Some(pct) => writeln!(f, "  utilization: {pct:.1}%"),
            None => writeln!(f, "  utilization: n/a"),
        }
    }
}
