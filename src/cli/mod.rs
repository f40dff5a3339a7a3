//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler merges its flags over the loaded configuration, runs the
//! pipeline, and returns the process exit code.

mod compare;
mod graph;
mod sbom;

pub use compare::{run_compare_deps, run_compare_sboms, CompareDepsArgs};
pub use graph::{resolve_format, run_graph, GraphArgs};
pub use sbom::{run_sbom, SbomArgs};

// Re-export config types used by handlers
pub use crate::config::AppConfig;
