//! Diagnostic codes and helper functions for the implementation optimizer.

use crate::candidate::ImplementationKind;
use tessera_common::FlowKey;
use tessera_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// Several input flows with one key were merged.
pub const O001: DiagnosticCode = DiagnosticCode::new(Category::Optimization, 1);

/// An input flow was discarded in favour of a later one with the same key.
pub const O002: DiagnosticCode = DiagnosticCode::new(Category::Optimization, 2);

/// Several input flows share a key and the input was refused.
pub const O003: DiagnosticCode = DiagnosticCode::new(Category::Optimization, 3);

/// A flow was forced onto a Direct path because nothing else fit.
pub const O004: DiagnosticCode = DiagnosticCode::new(Category::Optimization, 4);

/// No candidate fits the shared fabric.
pub const O005: DiagnosticCode = DiagnosticCode::new(Category::Optimization, 5);

/// An implementation was selected for a flow.
pub const O006: DiagnosticCode = DiagnosticCode::new(Category::Optimization, 6);

/// Creates a warning for merged duplicate flows.
pub fn flows_merged(key: &FlowKey, count: usize, bandwidth: f64) -> Diagnostic {
    Diagnostic::warning(O001, format!("merged {count} flows with the same key"))
        .with_subject(key.to_string())
        .with_note(format!("combined bandwidth is {bandwidth} GB/s"))
}

/// Creates a warning for a discarded duplicate flow.
pub fn flow_overwritten(key: &FlowKey, dropped_bandwidth: f64) -> Diagnostic {
    Diagnostic::warning(O002, "flow overwritten by a later flow with the same key")
        .with_subject(key.to_string())
        .with_note(format!("discarded requirement of {dropped_bandwidth} GB/s"))
}

/// Creates an error for a duplicated key under the reject policy.
pub fn duplicate_rejected(key: &FlowKey, count: usize) -> Diagnostic {
    Diagnostic::error(O003, format!("flow key declared {count} times"))
        .with_subject(key.to_string())
        .with_help("merge the flows or choose the `merge` or `overwrite` policy")
}

/// Creates a warning for a forced Direct assignment.
pub fn forced_direct(key: &FlowKey, bandwidth: f64, load: f64, capacity: f64) -> Diagnostic {
    Diagnostic::warning(O004, "forced onto a dedicated path")
        .with_subject(key.to_string())
        .with_note(format!(
            "{bandwidth} GB/s does not fit the shared fabric ({load} of {capacity} GB/s committed)"
        ))
}

/// Creates an error for a flow with no feasible candidate.
pub fn infeasible(key: &FlowKey, bandwidth: f64, load: f64, capacity: f64) -> Diagnostic {
    Diagnostic::error(O005, "no implementation fits the shared fabric")
        .with_subject(key.to_string())
        .with_note(format!(
            "{bandwidth} GB/s requested with {load} of {capacity} GB/s committed"
        ))
        .with_help("raise `fabric_capacity` or use the `force_direct` fallback")
}

/// Creates a note for a selected implementation.
pub fn selected(key: &FlowKey, kind: ImplementationKind, cost: f64) -> Diagnostic {
    Diagnostic::note(O006, format!("selected {kind} (cost {cost:.3})")).with_subject(key.to_string())
}
