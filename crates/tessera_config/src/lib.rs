//! Parsing and validation of high-level interconnect specification documents.
//!
//! A specification names the traffic sources and targets of a system, the
//! flows that must connect them, clock-domain and arbitration constraints,
//! and the weights and policies used by the implementation optimizer. This
//! crate reads such a document (TOML or JSON) into a strongly-typed
//! [`SpecDocument`] and checks it for consistency.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_spec, load_spec_from_json_str, load_spec_from_str, validate_spec};
pub use types::*;
