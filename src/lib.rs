//! **Dependency graph exploration and CycloneDX SBOM generation for build graphs.**
//!
//! `sbomgraph` ingests the raw dependency records of a build target (nodes
//! identified by store paths, edges tagged runtime or buildtime), builds an
//! immutable directed graph, and answers depth-bounded forward and inverse
//! reachability queries over it. Query results are exported as an ordered
//! edge table (CSV or Graphviz DOT) or assembled into a schema-validated
//! CycloneDX 1.3 document.
//!
//! ## Core Concepts & Modules
//!
//! - **[`source`]**: [`GraphSource`] implementations that hand over the raw
//!   records for a target: dumps on disk, an external command, or memory.
//! - **[`model`]**: [`DependencyGraph`], built once from a [`RawGraph`] and
//!   read-only afterwards, so any number of traversals may share it.
//! - **[`traversal`]**: breadth-first traversal bounded by a [`DepthLimit`]
//!   and restricted by an edge-kind filter.
//! - **[`projection`]**: turns a traversal into an [`OrderedTable`] or a
//!   [`ComponentSet`].
//! - **[`sbom`]**: the [`SbomAssembler`], content-derived identifiers and
//!   CycloneDX 1.3 schema validation.
//! - **[`compare`]**: component-level and relationship-level comparison of
//!   documents and exports.
//! - **[`pipeline`]**: the stages the CLI strings together.
//!
//! ## Getting Started
//!
//! ```no_run
//! use sbomgraph::model::{DependencyGraph, DocumentType};
//! use sbomgraph::projection::project_components;
//! use sbomgraph::sbom::{assemble, SbomMetadata};
//! use sbomgraph::source::{GraphSource, JsonFileSource};
//! use sbomgraph::traversal::{traverse, TraversalQuery};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = JsonFileSource::new();
//!     let raw = source.fetch("hello.graph.json")?;
//!     let graph = DependencyGraph::build(raw, Some(&source))?;
//!
//!     let root = graph.root_node().path().to_string();
//!     let result = traverse(&graph, &root, TraversalQuery::forward())?;
//!     let bom = assemble(
//!         &project_components(&result),
//!         DocumentType::Runtime,
//!         &SbomMetadata::default(),
//!     )?;
//!     println!("{}", bom.to_json_pretty()?);
//!     Ok(())
//! }
//! ```
//!
//! ### Inverse queries
//!
//! Which runtime dependents pull in `libunistring`, at most two hops away?
//!
//! ```no_run
//! # use sbomgraph::model::DependencyGraph;
//! use sbomgraph::projection::project_table;
//! use sbomgraph::traversal::{select_roots, traverse_from, TraversalQuery};
//!
//! # fn demo(graph: &DependencyGraph) -> sbomgraph::Result<()> {
//! let roots = select_roots(graph, "libunistring")?;
//! let result = traverse_from(graph, &roots, TraversalQuery::inverse().with_depth(2))?;
//! for row in project_table(&result).rows() {
//!     println!("{} -> {}", row.src_path, row.dst_path);
//! }
//! # Ok(())
//! # }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // `from`/`to`, `src`/`dst` are clear in context
    clippy::similar_names,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod projection;
pub mod reports;
pub mod sbom;
pub mod source;
pub mod traversal;
pub mod utils;

// Re-export main types for convenience
pub use config::{AppConfig, ConfigError, Validatable};
pub use error::{ErrorContext, OptionContext, Result, SbomGraphError};
pub use model::{DependencyGraph, DocumentType, EdgeKind, KindFilter, Node, RawGraph};
pub use projection::{ComponentSet, OrderedTable, TableRow};
pub use sbom::{CycloneDxBom, SbomAssembler, SbomMetadata};
pub use source::{GraphSource, JsonFileSource};
pub use traversal::{traverse, traverse_from, DepthLimit, Direction, TraversalQuery, TraversalResult};
