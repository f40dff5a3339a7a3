//! Default values for sbomgraph configuration.

/// Default graph export depth: the target and its direct dependencies
pub const DEFAULT_GRAPH_DEPTH: usize = 1;

/// Default tool vendor recorded in SBOM metadata
pub const DEFAULT_TOOL_VENDOR: &str = "sbomgraph";

/// Default tool name recorded in SBOM metadata
pub const DEFAULT_TOOL_NAME: &str = env!("CARGO_PKG_NAME");

/// Config file names searched in each location, in order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".sbomgraph.yaml",
    ".sbomgraph.yml",
    "sbomgraph.yaml",
    "sbomgraph.yml",
];
