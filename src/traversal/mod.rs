//! Depth-bounded breadth-first traversal over a [`DependencyGraph`].
//!
//! Forward traversal follows edges from dependent to dependency; inverse
//! traversal follows them backwards, yielding the ancestors of its roots.
//! Each node is visited once, at the first (minimal) depth it is reached.
//! Neighbors are taken in the order their parent's adjacency enumerates
//! them, so results are identical across runs on identical input.

mod depth;

pub use depth::{DepthLimit, DepthSetting};

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::NodeIndex;
use regex::Regex;
use tracing::debug;

use crate::error::{OptionContext, Result, SbomGraphError};
use crate::model::{DependencyGraph, EdgeKind, KindFilter, Node};

/// Which way edges are walked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `from → to`: dependencies of the root
    #[default]
    Forward,
    /// `to → from`: dependents of the root
    Inverse,
}

impl Direction {
    const fn petgraph(self) -> petgraph::Direction {
        match self {
            Self::Forward => petgraph::Direction::Outgoing,
            Self::Inverse => petgraph::Direction::Incoming,
        }
    }
}

/// Parameters of one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalQuery {
    pub direction: Direction,
    pub max_depth: DepthLimit,
    pub kind_filter: KindFilter,
}

impl TraversalQuery {
    /// Unbounded forward traversal over runtime edges
    #[must_use]
    pub fn forward() -> Self {
        Self::default()
    }

    /// Unbounded inverse traversal over runtime edges
    #[must_use]
    pub fn inverse() -> Self {
        Self {
            direction: Direction::Inverse,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_depth(mut self, max_depth: impl Into<DepthLimit>) -> Self {
        self.max_depth = max_depth.into();
        self
    }

    #[must_use]
    pub const fn with_filter(mut self, kind_filter: KindFilter) -> Self {
        self.kind_filter = kind_filter;
        self
    }
}

/// A node reached by a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    pub node: NodeIndex,
    /// Shortest qualifying-edge distance from the nearest root
    pub depth: usize,
}

/// A qualifying edge explored during a traversal.
///
/// `from`/`to` keep the dependency orientation regardless of direction.
/// `depth` is the depth of the node the edge leads to as seen from the
/// expanded node, i.e. the expanded node's depth plus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversedEdge {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub kind: EdgeKind,
    pub depth: usize,
}

/// Nodes reached by a traversal, in discovery order, plus the edges walked.
#[derive(Debug, Clone)]
pub struct TraversalResult<'g> {
    graph: &'g DependencyGraph,
    query: TraversalQuery,
    roots: Vec<NodeIndex>,
    visits: Vec<Visit>,
    depths: HashMap<NodeIndex, usize>,
    edges: Vec<TraversedEdge>,
}

impl<'g> TraversalResult<'g> {
    /// The graph this result was computed over
    #[must_use]
    pub const fn graph(&self) -> &'g DependencyGraph {
        self.graph
    }

    #[must_use]
    pub const fn query(&self) -> &TraversalQuery {
        &self.query
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// `(node, depth)` pairs in discovery order
    #[must_use]
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// Edges in exploration order
    #[must_use]
    pub fn edges(&self) -> &[TraversedEdge] {
        &self.edges
    }

    #[must_use]
    pub fn contains(&self, idx: NodeIndex) -> bool {
        self.depths.contains_key(&idx)
    }

    #[must_use]
    pub fn depth_of(&self, idx: NodeIndex) -> Option<usize> {
        self.depths.get(&idx).copied()
    }

    #[must_use]
    pub fn node(&self, idx: NodeIndex) -> &'g Node {
        self.graph.node(idx)
    }

    /// Paths of every visited node
    #[must_use]
    pub fn node_paths(&self) -> HashSet<&'g str> {
        self.visits
            .iter()
            .map(|v| self.graph.node(v.node).path())
            .collect()
    }

    /// `(from_path, to_path, kind)` for every walked edge, depth discarded
    #[must_use]
    pub fn edge_set(&self) -> HashSet<(&'g str, &'g str, EdgeKind)> {
        self.edges
            .iter()
            .map(|e| {
                (
                    self.graph.node(e.from).path(),
                    self.graph.node(e.to).path(),
                    e.kind,
                )
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }
}

/// Traverse from the node at `root`.
///
/// Fails with [`SbomGraphError::UnknownRoot`] when no node has that path.
pub fn traverse<'g>(
    graph: &'g DependencyGraph,
    root: &str,
    query: TraversalQuery,
) -> Result<TraversalResult<'g>> {
    let idx = graph.find(root).or_unknown_root(root)?;
    traverse_from(graph, &[idx], query)
}

/// Traverse from several roots at once, all starting at depth zero.
pub fn traverse_from<'g>(
    graph: &'g DependencyGraph,
    roots: &[NodeIndex],
    query: TraversalQuery,
) -> Result<TraversalResult<'g>> {
    if roots.is_empty() {
        return Err(SbomGraphError::unknown_root("<no roots selected>"));
    }
    if let Some(bad) = roots.iter().find(|r| r.index() >= graph.node_count()) {
        return Err(SbomGraphError::unknown_root(format!("node #{}", bad.index())));
    }

    let mut depths: HashMap<NodeIndex, usize> = HashMap::new();
    let mut visits = Vec::new();
    let mut edges = Vec::new();
    let mut queue = VecDeque::new();
    let mut unique_roots = Vec::with_capacity(roots.len());

    for &root in roots {
        if depths.insert(root, 0).is_none() {
            unique_roots.push(root);
            visits.push(Visit {
                node: root,
                depth: 0,
            });
            queue.push_back(root);
        }
    }

    let direction = query.direction.petgraph();
    while let Some(current) = queue.pop_front() {
        let depth = depths.get(&current).copied().unwrap_or_default();
        let next = depth + 1;
        if !query.max_depth.admits(next) {
            continue;
        }
        for adj in graph.adjacent(current, direction, query.kind_filter) {
            edges.push(TraversedEdge {
                from: adj.from,
                to: adj.to,
                kind: adj.kind,
                depth: next,
            });
            if !depths.contains_key(&adj.neighbor) {
                depths.insert(adj.neighbor, next);
                visits.push(Visit {
                    node: adj.neighbor,
                    depth: next,
                });
                queue.push_back(adj.neighbor);
            }
        }
    }

    debug!(
        roots = unique_roots.len(),
        nodes = visits.len(),
        edges = edges.len(),
        direction = ?query.direction,
        filter = %query.kind_filter,
        max_depth = %query.max_depth,
        "traversal finished"
    );

    Ok(TraversalResult {
        graph,
        query,
        roots: unique_roots,
        visits,
        depths,
        edges,
    })
}

/// Select traversal roots by a regular expression over node name and path.
///
/// Fails with [`SbomGraphError::UnknownRoot`] when nothing matches.
pub fn select_roots(graph: &DependencyGraph, pattern: &str) -> Result<Vec<NodeIndex>> {
    let regex = Regex::new(pattern)
        .map_err(|e| SbomGraphError::config(format!("invalid root selector '{pattern}': {e}")))?;
    let selected = graph.select(&regex);
    if selected.is_empty() {
        return Err(SbomGraphError::unknown_root(pattern));
    }
    Ok(selected)
}
