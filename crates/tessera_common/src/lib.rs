//! Shared foundational types used across the Tessera interconnect toolchain.
//!
//! This crate provides clock frequencies with unit parsing, named clock domains,
//! and the declarative traffic [`Flow`] requirements consumed by both the
//! topology generator and the implementation optimizer.

#![warn(missing_docs)]

pub mod flow;
pub mod frequency;

pub use flow::{ClockDomain, Flow, FlowKey};
pub use frequency::{Frequency, ParseFrequencyError};
