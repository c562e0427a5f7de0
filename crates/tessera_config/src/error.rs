//! Error types for specification loading and validation.

/// Errors that can occur when loading or validating a specification document.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the specification file.
    #[error("failed to read specification: {0}")]
    IoError(#[from] std::io::Error),

    /// The document content could not be parsed.
    #[error("failed to parse specification: {0}")]
    ParseError(String),

    /// A flow names a source or target that is not declared.
    #[error("flow {flow} references undeclared endpoint '{name}'")]
    UnknownEndpoint {
        /// The offending flow, rendered as `src -> dst`.
        flow: String,
        /// The undeclared name.
        name: String,
    },

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A specification value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}
