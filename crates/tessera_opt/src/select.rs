//! Greedy implementation selection under a shared-fabric capacity ceiling.
//!
//! Flows are visited in descending bandwidth order, ties kept in input order.
//! Each flow takes its cheapest candidate that still fits the shared fabric;
//! committed flows are never revisited. Candidate generation and costing are
//! read-only and run in parallel, while the capacity counter is updated
//! sequentially in visiting order so results do not depend on scheduling.

use crate::candidate::{candidates, ImplementationKind, ImplementationOption};
use crate::cost::CostModel;
use crate::dedup::{resolve_duplicates, DuplicateFlow};
use crate::error::OptimizeError;
use crate::errors;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tessera_common::{Flow, FlowKey};
use tessera_config::{FallbackPolicy, OptimizationConfig};
use tessera_diagnostics::DiagnosticSink;

/// How a flow came by its assignment.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum FlowOutcome {
    /// The cheapest candidate that fit the fabric.
    Selected,
    /// No candidate fit; a Direct path was imposed.
    ForcedDirect,
}

/// The implementation chosen for one flow.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Assignment {
    /// The chosen option.
    pub option: ImplementationOption,
    /// Its weighted cost for this flow.
    pub cost: f64,
    /// Whether it was selected or forced.
    pub outcome: FlowOutcome,
}

/// Aggregate figures over all assignments.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OptimizationSummary {
    /// Assignment count per implementation kind.
    pub kind_counts: BTreeMap<ImplementationKind, usize>,
    /// Sum of area costs.
    pub total_area: f64,
    /// Mean latency in cycles, 0 when there are no flows.
    pub average_latency: f64,
    /// Flows committed to the shared fabric.
    pub shared_fabric_flows: usize,
    /// Bandwidth committed to the shared fabric, in GB/s.
    pub fabric_load: f64,
    /// Capacity ceiling of the shared fabric, in GB/s.
    pub fabric_capacity: f64,
    /// Flows on dedicated paths, forced or not.
    pub dedicated_paths: usize,
    /// Flows behind an arbiter.
    pub arbitrated_flows: usize,
    /// Flows forced onto a dedicated path.
    pub forced_flows: usize,
}

/// The result of an optimization run.
#[derive(Clone, Debug, PartialEq)]
pub struct Optimization {
    /// Exactly one assignment per distinct flow key.
    pub assignments: BTreeMap<FlowKey, Assignment>,
    /// Aggregate figures.
    pub summary: OptimizationSummary,
    /// Keys that appeared more than once in the input.
    pub duplicates: Vec<DuplicateFlow>,
}

impl Optimization {
    /// Returns the assignment for `key`.
    pub fn assignment(&self, key: &FlowKey) -> Option<&Assignment> {
        self.assignments.get(key)
    }

    /// Returns the keys forced onto a dedicated path.
    pub fn forced(&self) -> Vec<&FlowKey> {
        self.assignments
            .iter()
            .filter(|(_, a)| a.outcome == FlowOutcome::ForcedDirect)
            .map(|(k, _)| k)
            .collect()
    }
}

struct Scored {
    option: ImplementationOption,
    cost: f64,
}

/// Selects an implementation for every flow.
///
/// Duplicate keys are first resolved by `config.duplicate_flows`. When no
/// candidate fits the remaining fabric capacity, `config.fallback` decides
/// between forcing a Direct path and failing with
/// [`OptimizeError::Infeasible`] once every flow has been visited.
pub fn optimize(
    flows: &[Flow],
    config: &OptimizationConfig,
    sink: &DiagnosticSink,
) -> Result<Optimization, OptimizeError> {
    let model = CostModel::new(&config.weights)?;
    let (flows, duplicates) = resolve_duplicates(flows, config.duplicate_flows, sink)?;

    let mut order: Vec<usize> = (0..flows.len()).collect();
    order.sort_by(|&a, &b| flows[b].bandwidth.total_cmp(&flows[a].bandwidth));

    let scored: Vec<Vec<Scored>> = flows
        .par_iter()
        .map(|flow| {
            candidates(flow.bandwidth)
                .into_iter()
                .map(|option| Scored {
                    cost: model.cost(&option, flow.max_latency),
                    option,
                })
                .collect()
        })
        .collect();

    let capacity = config.fabric_capacity;
    let mut load = 0.0;
    let mut assignments = BTreeMap::new();
    let mut infeasible = Vec::new();

    for index in order {
        let flow = &flows[index];
        let key = flow.key();
        let best = scored[index]
            .iter()
            .filter(|s| !s.option.uses_shared_fabric || load + flow.bandwidth <= capacity)
            .min_by(|a, b| a.cost.total_cmp(&b.cost));

        let assignment = match (best, config.fallback) {
            (Some(s), _) => Assignment {
                option: s.option,
                cost: s.cost,
                outcome: FlowOutcome::Selected,
            },
            (None, FallbackPolicy::ForceDirect) => {
                sink.emit(errors::forced_direct(&key, flow.bandwidth, load, capacity));
                tracing::warn!(flow = %key, bandwidth = flow.bandwidth, load, "forced dedicated path");
                let option = ImplementationOption::direct();
                Assignment {
                    cost: model.cost(&option, flow.max_latency),
                    option,
                    outcome: FlowOutcome::ForcedDirect,
                }
            }
            (None, FallbackPolicy::Strict) => {
                sink.emit(errors::infeasible(&key, flow.bandwidth, load, capacity));
                infeasible.push(key);
                continue;
            }
        };

        if assignment.option.uses_shared_fabric {
            load += flow.bandwidth;
        }
        if assignment.outcome == FlowOutcome::Selected {
            sink.emit(errors::selected(&key, assignment.option.kind, assignment.cost));
        }
        tracing::debug!(
            flow = %key,
            kind = %assignment.option.kind,
            cost = assignment.cost,
            load,
            "assigned flow"
        );
        assignments.insert(key, assignment);
    }

    if !infeasible.is_empty() {
        infeasible.sort();
        return Err(OptimizeError::Infeasible(infeasible));
    }

    let summary = summarize(&assignments, load, capacity);
    tracing::info!(
        flows = assignments.len(),
        fabric_load = load,
        forced = summary.forced_flows,
        total_area = summary.total_area,
        "optimization complete"
    );
    Ok(Optimization {
        assignments,
        summary,
        duplicates,
    })
}

fn summarize(
    assignments: &BTreeMap<FlowKey, Assignment>,
    fabric_load: f64,
    fabric_capacity: f64,
) -> OptimizationSummary {
    let mut summary = OptimizationSummary {
        fabric_load,
        fabric_capacity,
        ..OptimizationSummary::default()
    };
    let mut latency_sum = 0u64;
    for assignment in assignments.values() {
        let option = &assignment.option;
        *summary.kind_counts.entry(option.kind).or_default() += 1;
        summary.total_area += option.area_cost;
        latency_sum += u64::from(option.latency_cycles);
        if option.uses_shared_fabric {
            summary.shared_fabric_flows += 1;
        }
        match option.kind {
            ImplementationKind::Direct => summary.dedicated_paths += 1,
            ImplementationKind::Arbitrated => summary.arbitrated_flows += 1,
            ImplementationKind::SharedFabric => {}
        }
        if assignment.outcome == FlowOutcome::ForcedDirect {
            summary.forced_flows += 1;
        }
    }
    if !assignments.is_empty() {
        summary.average_latency = latency_sum as f64 / assignments.len() as f64;
    }
    summary
}

impl fmt::Display for OptimizationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Implementations:")?;
        for (kind, count) in &self.kind_counts {
            writeln!(f, "  {:14}: {count:3}", kind.to_string())?;
        }
        writeln!(f, "Total area: {:.1}", self.total_area)?;
        writeln!(f, "Average latency: {:.1} cycles", self.average_latency)?;
        writeln!(
            f,
            "Shared fabric: {} flows, {:.1} / {:.1} GB/s",
            self.shared_fabric_flows, self.fabric_load, self.fabric_capacity
        )?;
        if self.forced_flows > 0 {
            writeln!(f, "Forced dedicated paths: {}", self.forced_flows)?;
        }
        Ok(())
    }
}
