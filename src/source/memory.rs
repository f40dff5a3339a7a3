//! In-memory source for synthetic graphs.

use std::collections::HashMap;

use super::GraphSource;
use crate::error::{Result, SbomGraphError};
use crate::model::{RawGraph, RawNode};

/// Serves pre-registered raw graphs by target name.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    graphs: HashMap<String, RawGraph>,
    extra_nodes: HashMap<String, RawNode>,
}

impl StaticSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the graph returned for `target`
    #[must_use]
    pub fn with_graph(mut self, target: impl Into<String>, raw: RawGraph) -> Self {
        self.graphs.insert(target.into(), raw);
        self
    }

    /// Register a node that is only available through on-demand lookup
    #[must_use]
    pub fn with_extra_node(mut self, node: RawNode) -> Self {
        self.extra_nodes.insert(node.path.clone(), node);
        self
    }
}

impl GraphSource for StaticSource {
    fn fetch(&self, target: &str) -> Result<RawGraph> {
        self.graphs
            .get(target)
            .cloned()
            .ok_or_else(|| SbomGraphError::source_unavailable(target, "no graph registered"))
    }

    fn lookup_node(&self, path: &str) -> Result<Option<RawNode>> {
        Ok(self.extra_nodes.get(path).cloned())
    }

    fn name(&self) -> &str {
        "static"
    }
}
