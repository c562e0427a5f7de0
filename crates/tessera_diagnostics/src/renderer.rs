//! Diagnostic rendering backends for human-readable output.

use crate::diagnostic::Diagnostic;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;

    /// Renders a batch of diagnostics, one after another.
    fn render_all(&self, diags: &[Diagnostic]) -> String {
        diags.iter().map(|d| self.render(d)).collect()
    }
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// note[C001]: inserted ClockConverter `CPU0_NIU_Crossbar_CDC`
///   --> CPU0_NIU -> Crossbar
///    = note: slow -> fast
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes for the severity header.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        let label = format!("{}[{}]", diag.severity, diag.code);
        if !self.color {
            return label;
        }
        let ansi = diag.severity.ansi_color();
        format!("\x1b[1;{ansi}m{label}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        out.push_str(&format!("{}: {}\n", self.header(diag), diag.message));

        if let Some(subject) = &diag.subject {
            out.push_str(&format!("  --> {subject}\n"));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    #[test]
    fn render_note_with_subject() {
        let code = DiagnosticCode::new(Category::Conversion, 101);
        let diag = Diagnostic::note(code, "inserted ClockConverter")
            .with_subject("NIU1_Router1_CDC")
            .with_note("fast -> slow");

        let output = TerminalRenderer::new(false).render(&diag);

        assert!(output.starts_with("note[C101]: inserted ClockConverter\n"));
        assert!(output.contains("  --> NIU1_Router1_CDC\n"));
        assert!(output.contains("   = note: fast -> slow\n"));
    }

    #[test]
    fn render_warning_with_help() {
        let code = DiagnosticCode::new(Category::Optimization, 3);
        let diag = Diagnostic::warning(code, "forced direct implementation")
            .with_help("raise the fabric capacity");

        let output = TerminalRenderer::new(false).render(&diag);

        assert!(output.contains("warning[O003]: forced direct implementation"));
        assert!(output.contains("= help: raise the fabric capacity"));
        assert!(!output.contains("-->"));
    }

    #[test]
    fn color_wraps_header_only() {
        let code = DiagnosticCode::new(Category::Error, 1);
        let diag = Diagnostic::error(code, "bad document");
        let output = TerminalRenderer::new(true).render(&diag);
        assert!(output.starts_with("\x1b[1;31merror[E001]\x1b[0m: bad document"));
    }

    #[test]
    fn render_all_concatenates() {
        let code = DiagnosticCode::new(Category::Generation, 1);
        let diags = vec![
            Diagnostic::note(code, "first"),
            Diagnostic::note(code, "second"),
        ];
        let output = TerminalRenderer::new(false).render_all(&diags);
        assert_eq!(output.lines().count(), 2);
    }
}
