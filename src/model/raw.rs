//! Raw graph records as delivered by a dependency source.
//!
//! These are the untyped, possibly inconsistent inputs to
//! [`DependencyGraph::build`](super::DependencyGraph::build). Duplicates,
//! self-loops and attribute conflicts are all legal here.

use super::EdgeKind;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Complete dependency data for one build target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGraph {
    /// Path of the build target itself
    pub root: String,
    /// Node records, possibly repeated
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    /// Edge records, possibly repeated
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

/// A node record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// An edge record: `from` depends on `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

impl RawGraph {
    /// Start a raw graph for `root`
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Append a node record
    #[must_use]
    pub fn node(mut self, path: &str, name: Option<&str>, version: Option<&str>) -> Self {
        self.nodes.push(RawNode {
            path: path.to_string(),
            name: name.map(str::to_string),
            version: version.map(str::to_string),
        });
        self
    }

    /// Append an edge record
    #[must_use]
    pub fn edge(mut self, from: &str, to: &str, kind: EdgeKind) -> Self {
        self.edges.push(RawEdge {
            from: from.to_string(),
            to: to.to_string(),
            kind,
        });
        self
    }

    /// Parse a JSON raw-graph dump
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a YAML raw-graph dump
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}
