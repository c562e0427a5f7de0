//! Diagnostic creation, severity management, and text rendering.
//!
//! Every pass in the toolchain reports the items it inserted, merged, forced,
//! or skipped as structured [`Diagnostic`] messages carrying a severity level,
//! a stable code, and the name of the affected item. The thread-safe
//! [`DiagnosticSink`] accumulates them while a pass keeps running, and a
//! [`DiagnosticRenderer`] formats them for display.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
