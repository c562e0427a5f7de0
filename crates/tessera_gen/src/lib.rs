//! Crossbar topology generation from a high-level specification.
//!
//! [`generate_crossbar`] turns a [`SpecDocument`](tessera_config::SpecDocument)
//! into a full crossbar: one adapter per endpoint and a single shared switch.
//! [`optimize_bandwidth`] then refines it against the declared flows with
//! dedicated routers for heavy flows and arbiters for light ones. The result
//! can be summarized with [`CrossbarTopology::summary`] or exported with
//! [`CrossbarTopology::to_document`].

#![warn(missing_docs)]

pub mod bandwidth;
pub mod crossbar;
pub mod errors;
pub mod sizing;
pub mod summary;

pub use bandwidth::{
    aggregate_flows, optimize_bandwidth, AggregatedFlow, ArbiterGroup, BandwidthClass,
    BandwidthReport, DedicatedPath,
};
pub use crossbar::{generate_crossbar, CrossbarTopology, FlowPlacement};
pub use sizing::{select_width, ClockClass, WIDTH_CANDIDATES};
pub use summary::TopologySummary;
