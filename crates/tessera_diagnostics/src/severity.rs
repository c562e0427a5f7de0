//! How serious a pass report is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic, ordered `Note < Warning < Error`.
///
/// Passes record every structural change as a `Note`, every skipped or
/// overridden input as a `Warning`, and reserve `Error` for inputs that make
/// the result unusable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A change the pass made.
    Note,
    /// Something the pass skipped, merged, or forced, then carried on.
    Warning,
    /// The pass result cannot be trusted.
    Error,
}

impl Severity {
    /// Returns `true` if this severity is [`Error`](Severity::Error).
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }

    /// Lowercase label used in rendered headers.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// ANSI SGR color code for the rendered header.
    pub fn ansi_color(self) -> &'static str {
        match self {
            Severity::Note => "36",
            Severity::Warning => "33",
            Severity::Error => "31",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
