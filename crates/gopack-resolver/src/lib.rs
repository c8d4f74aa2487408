//! Transitive dependency resolution: a depth-first, pre-order walk over the
//! dependency forest driven by an explicit worklist, with per-run
//! de-duplication and a report of every visit.

pub mod pipeline;
pub mod report;
pub mod visited;

pub use pipeline::Pipeline;
pub use report::{ResolutionReport, Visit};
