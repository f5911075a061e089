#![warn(missing_docs)]

//! Rust library for forward time Wright-Fisher
//! simulation that records the complete ancestry
//! of every chromosome.
//!
//! # Overview
//!
//! A population of `N` diploids is simulated for a
//! fixed number of generations. Every chromosome ever
//! born is a node, and every genomic interval a child
//! inherits from a parent is an edge. The output is
//! unsimplified: no node or edge is ever removed.
//!
//! Currently, this should be viewed as **experimental**.
//!
//! # Example
//!
//! ```
//! use wfarg::prelude::*;
//!
//! let params = SimulationParams::from_scaled(10, 10.0, Some(10.0), Some(6), 42).unwrap();
//! let output = neutral_wf(params).unwrap();
//! let tables = output.export();
//! assert_eq!(tables.samples.len(), 6);
//! assert_eq!(tables.nodes.len(), 20 * (200 + 1));
//! ```
//!
//! # Where to find examples
//!
//! In the `demos/` directory of the project repository.

pub mod audit;
mod error;
pub mod prelude;
mod samples;
mod simulation_flags;
mod tables;
#[cfg(feature = "tskit")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "tskit")))]
pub mod tskit_export;
pub mod wright_fisher;

pub use wfarg_core::{DemeId, NodeId, Position, Time};
pub use wfarg_genetics::{
    split_breakpoints, Breakpoint, GameteSegments, GenerateBreakpoints, GeneticMap,
    RecombinationPolicy, Segment,
};

pub use error::{WfArgError, WfArgResult};
pub use samples::{fill_samples, subsample};
pub use simulation_flags::SimulationFlags;
pub use tables::*;
pub use wright_fisher::{
    neutral_wf, ExportTables, SimulationOutput, SimulationParams, WrightFisher,
};

/// Get the wfarg version number.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
