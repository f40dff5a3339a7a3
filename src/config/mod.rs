//! Configuration for sbomgraph.
//!
//! Configuration is read from a YAML file discovered in the usual places
//! and validated before use. Command-line flags override file values.
//!
//! ```yaml
//! graph:
//!   depth: 3
//!   kind_filter: runtime
//! sbom:
//!   document_type: both
//! source:
//!   kind: command
//!   command: nix-graph-dump
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    CONFIG_FILE_NAMES, DEFAULT_GRAPH_DEPTH, DEFAULT_TOOL_NAME, DEFAULT_TOOL_VENDOR,
};
pub use file::{
    discover_config_file, generate_example_config, load_config, load_config_file,
    load_or_default,
};
pub use types::{AppConfig, GraphConfig, OutputConfig, SbomConfig, SourceConfig};
pub use validation::{ConfigError, Validatable};

/// Generate a JSON Schema for the `AppConfig` configuration format.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
