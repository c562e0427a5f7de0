//! Diagnostic codes and helper functions for converter insertion.
//!
//! `C001`--`C003` are informational reports of what the pass did; `C004`
//! warns about edges the pass could not analyze.

use tessera_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// A converter node was inserted.
pub const C001: DiagnosticCode = DiagnosticCode {
    category: Category::Conversion,
    number: 1,
};

/// An edge was split into several hops.
pub const C002: DiagnosticCode = DiagnosticCode {
    category: Category::Conversion,
    number: 2,
};

/// A converter name was already taken and received a numeric suffix.
pub const C003: DiagnosticCode = DiagnosticCode {
    category: Category::Conversion,
    number: 3,
};

/// An edge references a missing node and was passed through unchanged.
pub const C004: DiagnosticCode = DiagnosticCode {
    category: Category::Conversion,
    number: 4,
};

/// Creates a note for an inserted converter.
pub fn converter_inserted(name: &str, kind: &str, edge: &str) -> Diagnostic {
    Diagnostic::note(C001, format!("inserted {kind} `{name}`"))
        .with_subject(name)
        .with_note(format!("bridges edge {edge}"))
}

/// Creates a note for an edge split into `hops` hops.
pub fn edge_split(edge: &str, hops: usize, reason: &str) -> Diagnostic {
    Diagnostic::note(C002, format!("split edge into {hops} hops: {reason}")).with_subject(edge)
}

/// Creates a note for a converter name that needed a suffix.
pub fn name_disambiguated(base: &str, chosen: &str) -> Diagnostic {
    Diagnostic::note(C003, format!("converter name `{base}` is taken, using `{chosen}`"))
        .with_subject(chosen)
}

/// Creates a warning for an edge with an unknown endpoint.
pub fn unresolved_edge(edge: &str) -> Diagnostic {
    Diagnostic::warning(C004, format!("edge {edge} references a node that does not exist"))
        .with_subject(edge)
        .with_help("the edge is kept unchanged; fix the node id to have it checked")
}
