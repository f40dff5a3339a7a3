//! Projections of a traversal result.
//!
//! [`project_table`] produces the row form used for tabular and graphical
//! export; [`project_components`] produces the component/relationship form
//! the SBOM assembler consumes. Both carry the same edge set.

use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::model::{DependencyGraph, EdgeKind, Node};
use crate::traversal::{Direction, TraversalResult};

/// One exported edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub src_path: String,
    pub src_name: String,
    pub src_version: String,
    pub dst_path: String,
    pub dst_name: String,
    pub dst_version: String,
    pub edge_kind: EdgeKind,
    pub graph_depth: usize,
}

impl TableRow {
    fn new(src: &Node, dst: &Node, edge_kind: EdgeKind, graph_depth: usize) -> Self {
        Self {
            src_path: src.path().to_string(),
            src_name: src.name.clone().unwrap_or_default(),
            src_version: src.version.clone().unwrap_or_default(),
            dst_path: dst.path().to_string(),
            dst_name: dst.name.clone().unwrap_or_default(),
            dst_version: dst.version.clone().unwrap_or_default(),
            edge_kind,
            graph_depth,
        }
    }
}

/// Deterministically ordered edge rows.
///
/// Rows are grouped by the node whose expansion produced them, groups in
/// traversal discovery order, rows within a group by the path of the node
/// reached and then by edge kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedTable {
    rows: Vec<TableRow>,
}

impl OrderedTable {
    /// Wrap rows that are already in their final order
    #[must_use]
    pub fn from_rows(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(src_path, dst_path, kind)` for every row, depth discarded
    #[must_use]
    pub fn edge_set(&self) -> HashSet<(&str, &str, EdgeKind)> {
        self.rows
            .iter()
            .map(|r| (r.src_path.as_str(), r.dst_path.as_str(), r.edge_kind))
            .collect()
    }

    /// `(src_path, dst_path)` pairs with kinds collapsed
    #[must_use]
    pub fn edge_pairs(&self) -> HashSet<(&str, &str)> {
        self.rows
            .iter()
            .map(|r| (r.src_path.as_str(), r.dst_path.as_str()))
            .collect()
    }
}

/// Project a traversal into ordered rows.
#[must_use]
pub fn project_table(result: &TraversalResult<'_>) -> OrderedTable {
    let graph = result.graph();
    let order: HashMap<NodeIndex, usize> = result
        .visits()
        .iter()
        .enumerate()
        .map(|(i, v)| (v.node, i))
        .collect();
    let inverse = result.query().direction == Direction::Inverse;

    let mut keyed: Vec<(usize, &str, EdgeKind, TableRow)> = result
        .edges()
        .iter()
        .map(|e| {
            let (expanded, reached) = if inverse { (e.to, e.from) } else { (e.from, e.to) };
            let row = TableRow::new(graph.node(e.from), graph.node(e.to), e.kind, e.depth);
            let rank = order.get(&expanded).copied().unwrap_or(usize::MAX);
            (rank, graph.node(reached).path(), e.kind, row)
        })
        .collect();
    keyed.sort_by(|a, b| (a.0, a.1, a.2).cmp(&(b.0, b.1, b.2)));

    OrderedTable {
        rows: keyed.into_iter().map(|(_, _, _, row)| row).collect(),
    }
}

/// Distinct nodes of a traversal and the edges among them.
#[derive(Debug, Clone)]
pub struct ComponentSet<'g> {
    graph: &'g DependencyGraph,
    roots: Vec<NodeIndex>,
    nodes: Vec<NodeIndex>,
    edges: Vec<(NodeIndex, NodeIndex, EdgeKind)>,
    depends_on: IndexMap<NodeIndex, IndexSet<NodeIndex>>,
}

impl<'g> ComponentSet<'g> {
    #[must_use]
    pub const fn graph(&self) -> &'g DependencyGraph {
        self.graph
    }

    /// The node that describes the document subject
    #[must_use]
    pub fn primary(&self) -> Option<NodeIndex> {
        self.roots.first().copied()
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// Nodes in discovery order
    #[must_use]
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    /// Edges with kinds, in exploration order
    #[must_use]
    pub fn edges(&self) -> &[(NodeIndex, NodeIndex, EdgeKind)] {
        &self.edges
    }

    #[must_use]
    pub fn node(&self, idx: NodeIndex) -> &'g Node {
        self.graph.node(idx)
    }

    /// Direct dependencies of `idx` within the set, kinds collapsed,
    /// first-seen order
    #[must_use]
    pub fn depends_on(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.depends_on.get(&idx).into_iter().flatten().copied()
    }

    /// `(from_path, to_path, kind)` for every edge
    #[must_use]
    pub fn edge_set(&self) -> HashSet<(&'g str, &'g str, EdgeKind)> {
        self.edges
            .iter()
            .map(|(f, t, k)| (self.graph.node(*f).path(), self.graph.node(*t).path(), *k))
            .collect()
    }
}

/// Project a traversal into components and relationships.
#[must_use]
pub fn project_components<'g>(result: &TraversalResult<'g>) -> ComponentSet<'g> {
    let edges: Vec<(NodeIndex, NodeIndex, EdgeKind)> =
        result.edges().iter().map(|e| (e.from, e.to, e.kind)).collect();
    let mut depends_on: IndexMap<NodeIndex, IndexSet<NodeIndex>> = IndexMap::new();
    for (from, to, _) in &edges {
        depends_on.entry(*from).or_default().insert(*to);
    }
    ComponentSet {
        graph: result.graph(),
        roots: result.roots().to_vec(),
        nodes: result.visits().iter().map(|v| v.node).collect(),
        edges,
        depends_on,
    }
}
