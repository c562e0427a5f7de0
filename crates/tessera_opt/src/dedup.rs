//! Resolution of input flows that share a (src, dst) key.

use crate::error::OptimizeError;
use crate::errors;
use serde::Serialize;
use std::collections::HashMap;
use tessera_common::{Flow, FlowKey};
use tessera_config::DuplicatePolicy;
use tessera_diagnostics::DiagnosticSink;

/// A key that appeared more than once in the input, and what became of it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DuplicateFlow {
    /// The shared key.
    pub key: FlowKey,
    /// How many input flows carried it.
    pub occurrences: usize,
    /// The flow that was kept (merged, or the last one).
    pub kept: Flow,
    /// Input flows whose requirement was discarded; empty when merging.
    pub dropped: Vec<Flow>,
}

/// Collapses `flows` to one flow per key according to `policy`.
///
/// The surviving flows keep the input position of the flow that defines them:
/// the first occurrence when merging, the last when overwriting. Every
/// duplicated key is reported to `sink` and returned. Under
/// [`DuplicatePolicy::Reject`] all duplicated keys are reported before the
/// error is returned.
pub fn resolve_duplicates(
    flows: &[Flow],
    policy: DuplicatePolicy,
    sink: &DiagnosticSink,
) -> Result<(Vec<Flow>, Vec<DuplicateFlow>), OptimizeError> {
    let mut groups: Vec<(FlowKey, Vec<(usize, &Flow)>)> = Vec::new();
    let mut slot: HashMap<FlowKey, usize> = HashMap::new();
    for (position, flow) in flows.iter().enumerate() {
        let key = flow.key();
        match slot.get(&key) {
            Some(&i) => groups[i].1.push((position, flow)),
            None => {
                slot.insert(key.clone(), groups.len());
                groups.push((key, vec![(position, flow)]));
            }
        }
    }

    if groups.len() == flows.len() {
        return Ok((flows.to_vec(), Vec::new()));
    }

    if policy == DuplicatePolicy::Reject {
        let mut keys = Vec::new();
        for (key, group) in groups.iter().filter(|(_, g)| g.len() > 1) {
            sink.emit(errors::duplicate_rejected(key, group.len()));
            keys.push(key.clone());
        }
        keys.sort();
        return Err(OptimizeError::DuplicateFlows(keys));
    }

    let mut resolved: Vec<(usize, Flow)> = Vec::with_capacity(groups.len());
    let mut duplicates = Vec::new();
    for (key, group) in groups {
        let (position, kept, dropped) = match (group.as_slice(), policy) {
            ([(position, only)], _) => {
                resolved.push((*position, (*only).clone()));
                continue;
            }
            ([earlier @ .., (position, last)], DuplicatePolicy::Overwrite) => {
                for (_, flow) in earlier {
                    sink.emit(errors::flow_overwritten(&key, flow.bandwidth));
                }
                let dropped = earlier.iter().map(|(_, f)| (*f).clone()).collect();
                (*position, (*last).clone(), dropped)
            }
            _ => {
                let merged = merge(&group);
                sink.emit(errors::flows_merged(&key, group.len(), merged.bandwidth));
                (group[0].0, merged, Vec::new())
            }
        };
        tracing::warn!(flow = %key, occurrences = group.len(), ?policy, "duplicate flow key");
        duplicates.push(DuplicateFlow {
            key,
            occurrences: group.len(),
            kept: kept.clone(),
            dropped,
        });
        resolved.push((position, kept));
    }

    resolved.sort_by_key(|(position, _)| *position);
    Ok((resolved.into_iter().map(|(_, f)| f).collect(), duplicates))
}

/// Sums bandwidth, keeps the tightest latency and the highest priority.
fn merge(group: &[(usize, &Flow)]) -> Flow {
    let mut merged = group[0].1.clone();
    merged.bandwidth = group.iter().map(|(_, f)| f.bandwidth).sum();
    merged.max_latency = group.iter().map(|(_, f)| f.max_latency).min().unwrap_or(merged.max_latency);
    merged.priority = group.iter().map(|(_, f)| f.priority).max().unwrap_or(merged.priority);
    merged
}
