//! Diagnostic codes and helper functions for topology generation.
//!
//! `G001`--`G004` report what the bandwidth pass inserted or removed; `G005`
//! and `G006` cover flows it merged or left alone; `G007` warns about flows
//! it could not place. `G008` reports a switch edge put back for a flow added
//! after an earlier run.

use tessera_common::FlowKey;
use tessera_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// A dedicated router was inserted for a high-bandwidth flow.
pub const G001: DiagnosticCode = DiagnosticCode::new(Category::Generation, 1);

/// An arbiter was inserted for a batch of low-bandwidth sources.
pub const G002: DiagnosticCode = DiagnosticCode::new(Category::Generation, 2);

/// A shared-switch edge was removed.
pub const G003: DiagnosticCode = DiagnosticCode::new(Category::Generation, 3);

/// The switch port count was recomputed.
pub const G004: DiagnosticCode = DiagnosticCode::new(Category::Generation, 4);

/// Several declared flows with the same key were summed.
pub const G005: DiagnosticCode = DiagnosticCode::new(Category::Generation, 5);

/// A flow was already handled by an earlier run of the pass.
pub const G006: DiagnosticCode = DiagnosticCode::new(Category::Generation, 6);

/// A flow names an endpoint the topology does not contain.
pub const G007: DiagnosticCode = DiagnosticCode::new(Category::Generation, 7);

/// A shared-switch edge removed by an earlier run was restored.
pub const G008: DiagnosticCode = DiagnosticCode::new(Category::Generation, 8);

/// Creates a note for a dedicated router.
pub fn dedicated_router(router: &str, key: &FlowKey, bandwidth: f64) -> Diagnostic {
    Diagnostic::note(G001, format!("inserted dedicated router `{router}`"))
        .with_subject(key.to_string())
        .with_note(format!("flow carries {bandwidth} GB/s"))
}

/// Creates a note for an arbiter and the sources behind it.
pub fn arbiter_inserted(arbiter: &str, sources: &[String]) -> Diagnostic {
    Diagnostic::note(G002, format!("inserted arbiter `{arbiter}`"))
        .with_subject(arbiter)
        .with_note(format!("arbitrates {}", sources.join(", ")))
}

/// Creates a note for a removed switch edge.
pub fn switch_edge_removed(edge: &str) -> Diagnostic {
    Diagnostic::note(G003, "removed shared switch edge").with_subject(edge)
}

/// Creates a note for a restored switch edge.
pub fn switch_edge_restored(edge: &str, key: &FlowKey) -> Diagnostic {
    Diagnostic::note(G008, "restored shared switch edge")
        .with_subject(edge)
        .with_note(format!("needed by {key}"))
}

/// Creates a note for a recomputed switch port count.
pub fn ports_recomputed(switch: &str, before: u32, after: u32) -> Diagnostic {
    Diagnostic::note(G004, format!("port count changed from {before} to {after}"))
        .with_subject(switch)
}

/// Creates a note for merged duplicate flows.
pub fn flows_summed(key: &FlowKey, count: usize, total: f64) -> Diagnostic {
    Diagnostic::note(G005, format!("summed {count} flows into {total} GB/s")).with_subject(key.to_string())
}

/// Creates a note for a flow skipped because it was already placed.
pub fn already_optimized(key: &FlowKey) -> Diagnostic {
    Diagnostic::note(G006, "flow already placed by an earlier run").with_subject(key.to_string())
}

/// Creates a warning for a flow with an unknown endpoint.
pub fn unknown_endpoint(key: &FlowKey, name: &str) -> Diagnostic {
    Diagnostic::warning(G007, format!("flow endpoint `{name}` is not in the topology"))
        .with_subject(key.to_string())
}
