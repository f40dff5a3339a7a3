//! Graph export stage.

use tracing::info;

use crate::error::Result;
use crate::model::{DependencyGraph, KindFilter};
use crate::projection::{project_table, OrderedTable};
use crate::reports::{create_renderer, RenderMode};
use crate::traversal::{select_roots, traverse_from, DepthLimit, Direction, TraversalQuery};

/// What to export from a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphRequest {
    pub depth: DepthLimit,
    pub kind_filter: KindFilter,
    /// Regex selecting inverse-traversal roots; forward from the target if unset
    pub inverse: Option<String>,
}

impl Default for GraphRequest {
    fn default() -> Self {
        Self {
            depth: DepthLimit::Bounded(crate::config::DEFAULT_GRAPH_DEPTH),
            kind_filter: KindFilter::Runtime,
            inverse: None,
        }
    }
}

/// Traverse and project into an ordered table.
pub fn export_graph(graph: &DependencyGraph, request: &GraphRequest) -> Result<OrderedTable> {
    let (roots, direction) = match &request.inverse {
        Some(pattern) => (select_roots(graph, pattern)?, Direction::Inverse),
        None => (vec![graph.root()], Direction::Forward),
    };
    let query = TraversalQuery {
        direction,
        max_depth: request.depth,
        kind_filter: request.kind_filter,
    };
    let result = traverse_from(graph, &roots, query)?;
    let table = project_table(&result);
    info!(
        rows = table.len(),
        nodes = result.len(),
        depth = %request.depth,
        "graph exported"
    );
    Ok(table)
}

/// Render a table in the given mode
pub fn render_table(table: &OrderedTable, mode: RenderMode) -> Result<String> {
    create_renderer(mode).render(table)
}
