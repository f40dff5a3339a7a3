//! Pipeline orchestration.
//!
//! acquire → build → traverse → project → {render table, assemble SBOM} →
//! write. Every stage completes in memory before anything is written, so a
//! failure at any point leaves no partial output behind.

mod acquire;
mod graph_stage;
mod output;
mod sbom_stage;

pub use acquire::{build_source, load_graph};
pub use graph_stage::{export_graph, render_table, GraphRequest};
pub use output::{write_atomic, write_output, OutputTarget};
pub use sbom_stage::{generate_sbom, metadata_from_config};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success; comparisons found no difference
    pub const SUCCESS: i32 = 0;
    /// A comparison found differences
    pub const MISMATCH: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}
