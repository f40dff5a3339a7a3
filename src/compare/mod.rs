//! Comparison utility for assembled documents and tabular exports.
//!
//! Used to check that two runs against the same target produce equivalent
//! documents, and that an SBOM encodes exactly the edges of a graph export.

mod deps;
mod sboms;

pub use deps::{compare_deps, DepsComparison};
pub use sboms::{compare_sboms, parse_uid, SbomComparison, UidField};
