//! Converter insertion for interconnect graphs.
//!
//! [`insert_converters`] walks every edge of a [`Graph`](tessera_graph::Graph)
//! once, detects clock-domain crossings and width mismatches between the two
//! endpoints, and splits each mismatched edge into a short path through
//! inserted `ClockConverter` and `WidthConverter` nodes. The clock bridge
//! always comes first when both are needed.

#![warn(missing_docs)]

pub mod analysis;
pub mod errors;
pub mod insert;

pub use analysis::{split_latency_three, split_latency_two, BridgePlan, EdgeCheck};
pub use insert::{insert_converters, ConversionReport, InsertedConverter, SkippedEdge};
