//! Typed dependency multigraph built from raw source records.
//!
//! Node identity is the path. An edge `A → B` means "A depends on B"; the
//! same pair may carry one runtime and one buildtime edge. Self-loops are
//! dropped at ingestion. Cycles are tolerated: nothing here assumes a DAG.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use regex::Regex;
use tracing::{debug, info, warn};

use super::{EdgeKind, KindFilter, Node, RawGraph};
use crate::error::{MalformedInputKind, Result, SbomGraphError};
use crate::source::GraphSource;
use crate::utils::content_hash;

/// One qualifying edge seen from a node during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacent {
    /// Node reached by following the edge
    pub neighbor: NodeIndex,
    /// Dependent end of the edge
    pub from: NodeIndex,
    /// Dependency end of the edge
    pub to: NodeIndex,
    /// Edge kind
    pub kind: EdgeKind,
}

/// Counters from one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Node records merged into an existing node
    pub merged_nodes: usize,
    /// Nodes supplied on demand by the source
    pub resolved_nodes: usize,
    /// Self-loop edges dropped
    pub dropped_self_loops: usize,
    /// Exact duplicate edges dropped
    pub dropped_duplicates: usize,
}

/// The full node and edge set for one build target.
///
/// Immutable after [`build`](Self::build); traversals only borrow it, so one
/// graph can serve any number of concurrent queries.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<Node, EdgeKind>,
    by_path: HashMap<String, NodeIndex>,
    root: NodeIndex,
    stats: IngestStats,
}

impl DependencyGraph {
    /// Build a graph from raw records.
    ///
    /// Node records sharing a path merge into one node, later non-empty
    /// attributes winning. Edges naming an unknown path are resolved through
    /// `resolver` when one is given; otherwise the input is malformed.
    pub fn build(raw: RawGraph, resolver: Option<&dyn GraphSource>) -> Result<Self> {
        let RawGraph { root, nodes, edges } = raw;
        let mut graph: DiGraph<Node, EdgeKind> = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut by_path: HashMap<String, NodeIndex> = HashMap::with_capacity(nodes.len());
        let mut stats = IngestStats::default();

        for record in nodes {
            if record.path.trim().is_empty() {
                return Err(SbomGraphError::malformed(
                    "ingesting node records",
                    MalformedInputKind::EmptyPath,
                ));
            }
            if let Some(&idx) = by_path.get(&record.path) {
                stats.merged_nodes += 1;
                if graph[idx].merge_attributes(record.name.as_deref(), record.version.as_deref())
                {
                    debug!(path = %record.path, "merged conflicting node attributes");
                }
            } else {
                let mut node = Node::new(record.path.clone());
                node.merge_attributes(record.name.as_deref(), record.version.as_deref());
                let idx = graph.add_node(node);
                by_path.insert(record.path, idx);
            }
        }

        let mut seen: HashSet<(NodeIndex, NodeIndex, EdgeKind)> = HashSet::new();
        for edge in edges {
            if edge.from == edge.to {
                stats.dropped_self_loops += 1;
                debug!(path = %edge.from, kind = %edge.kind, "dropping self-loop");
                continue;
            }
            let from = resolve_endpoint(
                &mut graph,
                &mut by_path,
                &mut stats,
                resolver,
                &edge.from,
                (&edge.from, &edge.to),
            )?;
            let to = resolve_endpoint(
                &mut graph,
                &mut by_path,
                &mut stats,
                resolver,
                &edge.to,
                (&edge.from, &edge.to),
            )?;
            if seen.insert((from, to, edge.kind)) {
                graph.add_edge(from, to, edge.kind);
            } else {
                stats.dropped_duplicates += 1;
            }
        }

        let root_idx = match by_path.get(&root) {
            Some(&idx) => idx,
            None => match resolver.map(|r| r.lookup_node(&root)).transpose()?.flatten() {
                Some(record) => {
                    stats.resolved_nodes += 1;
                    let mut node = Node::new(root.clone());
                    node.merge_attributes(record.name.as_deref(), record.version.as_deref());
                    let idx = graph.add_node(node);
                    by_path.insert(root.clone(), idx);
                    idx
                }
                None => {
                    return Err(SbomGraphError::malformed(
                        "locating build target",
                        MalformedInputKind::MissingRoot(root),
                    ))
                }
            },
        };

        for node in graph.node_weights_mut() {
            node.derive_missing_attributes();
        }

        if stats.dropped_duplicates > 0 {
            warn!(
                count = stats.dropped_duplicates,
                "raw graph contained duplicate edges"
            );
        }
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            self_loops = stats.dropped_self_loops,
            "dependency graph built"
        );

        Ok(Self {
            graph,
            by_path,
            root: root_idx,
            stats,
        })
    }

    /// Index of the build target
    #[must_use]
    pub const fn root(&self) -> NodeIndex {
        self.root
    }

    /// The build target node
    #[must_use]
    pub fn root_node(&self) -> &Node {
        &self.graph[self.root]
    }

    /// Node at `idx`; `idx` must come from this graph.
    #[must_use]
    pub fn node(&self, idx: NodeIndex) -> &Node {
        &self.graph[idx]
    }

    /// Look up a node by its path
    #[must_use]
    pub fn find(&self, path: &str) -> Option<NodeIndex> {
        self.by_path.get(path).copied()
    }

    /// All nodes in ingestion order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    /// All edges in ingestion order as `(from, to, kind)`
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, EdgeKind)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source(), e.target(), *e.weight()))
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Ingestion counters
    #[must_use]
    pub const fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Edges admitted by `filter` leaving `idx` (`Outgoing`, its dependencies)
    /// or entering it (`Incoming`, its dependents), in ingestion order.
    #[must_use]
    pub fn adjacent(&self, idx: NodeIndex, direction: Direction, filter: KindFilter) -> Vec<Adjacent> {
        let mut edges: Vec<(EdgeIndex, Adjacent)> = self
            .graph
            .edges_directed(idx, direction)
            .filter(|e| filter.admits(*e.weight()))
            .map(|e| {
                let neighbor = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (
                    e.id(),
                    Adjacent {
                        neighbor,
                        from: e.source(),
                        to: e.target(),
                        kind: *e.weight(),
                    },
                )
            })
            .collect();
        // petgraph walks adjacency newest-first; edge indices restore ingestion order.
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, adj)| adj).collect()
    }

    /// Nodes whose name or path matches `pattern`, in ingestion order
    #[must_use]
    pub fn select(&self, pattern: &Regex) -> Vec<NodeIndex> {
        self.nodes()
            .filter(|(_, node)| {
                pattern.is_match(node.path())
                    || node.name.as_deref().is_some_and(|n| pattern.is_match(n))
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Hash of the node and edge sets, independent of ingestion order
    #[must_use]
    pub fn content_hash(&self) -> u64 {
        let mut paths: Vec<&str> = self.graph.node_weights().map(Node::path).collect();
        paths.sort_unstable();
        let mut edges: Vec<(&str, &str, EdgeKind)> = self
            .edges()
            .map(|(f, t, k)| (self.graph[f].path(), self.graph[t].path(), k))
            .collect();
        edges.sort_unstable();

        let mut input = Vec::new();
        for path in paths {
            input.extend(path.as_bytes());
            input.push(0);
        }
        for (from, to, kind) in edges {
            input.extend(from.as_bytes());
            input.push(0);
            input.extend(to.as_bytes());
            input.push(0);
            input.extend(kind.as_str().as_bytes());
            input.push(0);
        }
        content_hash(&input)
    }
}

fn resolve_endpoint(
    graph: &mut DiGraph<Node, EdgeKind>,
    by_path: &mut HashMap<String, NodeIndex>,
    stats: &mut IngestStats,
    resolver: Option<&dyn GraphSource>,
    path: &str,
    edge: (&str, &str),
) -> Result<NodeIndex> {
    if let Some(&idx) = by_path.get(path) {
        return Ok(idx);
    }
    if path.trim().is_empty() {
        return Err(SbomGraphError::malformed(
            format!("ingesting edge {} -> {}", edge.0, edge.1),
            MalformedInputKind::EmptyPath,
        ));
    }
    let supplied = match resolver {
        Some(source) => source.lookup_node(path)?,
        None => None,
    };
    let Some(record) = supplied else {
        return Err(SbomGraphError::malformed(
            "ingesting edge records",
            MalformedInputKind::DanglingEdge {
                from: edge.0.to_string(),
                to: edge.1.to_string(),
                missing: path.to_string(),
            },
        ));
    };
    stats.resolved_nodes += 1;
    debug!(path, "node supplied on demand by source");
    let mut node = Node::new(path);
    node.merge_attributes(record.name.as_deref(), record.version.as_deref());
    let idx = graph.add_node(node);
    by_path.insert(path.to_string(), idx);
    Ok(idx)
}
