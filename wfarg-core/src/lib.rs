//! Low-level types shared by the `wfarg` crates.
//!
//! Node ids, genomic positions on the unit interval,
//! and forward birth times.

use thiserror::Error;

mod macros;
mod newtypes;
mod position;
#[cfg(feature = "rand")]
mod rand_position;
mod time;

pub use newtypes::{DemeId, NodeId};
pub use position::Position;
pub use time::Time;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("invalid position: {0:?}")]
    InvalidPosition(f64),
    #[error("invalid time: {0:?}")]
    InvalidTime(f64),
    #[error("{0}")]
    ConversionError(String),
}
