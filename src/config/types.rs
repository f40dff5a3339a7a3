//! Configuration types for sbomgraph.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::defaults::{DEFAULT_GRAPH_DEPTH, DEFAULT_TOOL_NAME, DEFAULT_TOOL_VENDOR};
use crate::model::{DocumentType, KindFilter};
use crate::reports::RenderMode;
use crate::source::SourceKind;
use crate::traversal::{DepthLimit, DepthSetting};

/// Top-level configuration, loadable from a YAML file.
///
/// Every section has defaults, so an empty file is a valid configuration.
/// Command-line flags override file values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Graph export settings
    pub graph: GraphConfig,
    /// SBOM generation settings
    pub sbom: SbomConfig,
    /// Output settings
    pub output: OutputConfig,
    /// Raw graph source settings
    pub source: SourceConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Graph export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GraphConfig {
    /// Traversal depth: a hop count or `unbounded`
    #[schemars(with = "DepthSetting")]
    pub depth: DepthLimit,
    /// Edge kinds to walk
    pub kind_filter: KindFilter,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            depth: DepthLimit::Bounded(DEFAULT_GRAPH_DEPTH),
            kind_filter: KindFilter::Runtime,
        }
    }
}

/// SBOM generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SbomConfig {
    /// Which edge kinds the document covers
    pub document_type: DocumentType,
    /// Tool vendor recorded in document metadata
    pub tool_vendor: String,
    /// Tool name recorded in document metadata
    pub tool_name: String,
    /// Fixed RFC 3339 generation timestamp, for reproducible output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_timestamp: Option<String>,
}

impl Default for SbomConfig {
    fn default() -> Self {
        Self {
            document_type: DocumentType::Runtime,
            tool_vendor: DEFAULT_TOOL_VENDOR.to_string(),
            tool_name: DEFAULT_TOOL_NAME.to_string(),
            pin_timestamp: None,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Graph export format used when the output path has no recognised extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<RenderMode>,
}

/// Raw graph source settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SourceConfig {
    /// Which source reads the target
    pub kind: SourceKind,
    /// Program run by the command source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Arguments placed before the target
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}
