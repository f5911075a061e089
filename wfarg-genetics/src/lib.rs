//! Recombination for Wright-Fisher simulation with
//! ancestry recording.
//!
//! A [`GeneticMap`] generates the crossover
//! [`Breakpoint`]s of one meiosis, and
//! [`GameteSegments`] turns them into the
//! genomic intervals inherited from each of
//! the parent's two gametes.

mod breakpoints;
mod segments;

pub use breakpoints::Breakpoint;
pub use breakpoints::GenerateBreakpoints;
pub use breakpoints::GeneticMap;
pub use breakpoints::RecombinationPolicy;
pub use segments::split_breakpoints;
pub use segments::GameteSegments;
pub use segments::Segment;
