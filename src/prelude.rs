//! The crate prelude
//!
//! # Example
//! ```
//! use wfarg::prelude::*;
//! ```

pub use crate::{
    neutral_wf, simple_time_reverser, AncestryTracker, DemeId, Edge, ExportTables, Node, NodeId,
    Position, RecombinationPolicy, SimulationFlags, SimulationOutput, SimulationParams, Time,
    WfArgError, WfArgResult, WrightFisher,
};
