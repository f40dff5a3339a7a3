//! Graph model: raw source records and the typed dependency multigraph.
//!
//! [`RawGraph`] is what a [`GraphSource`](crate::source::GraphSource) hands
//! over; [`DependencyGraph::build`] normalizes it into nodes keyed by path and
//! kind-tagged edges.

mod edge;
mod graph;
mod node;
mod raw;

pub use edge::{DocumentType, EdgeKind, KindFilter};
pub use graph::{Adjacent, DependencyGraph, IngestStats};
pub use node::Node;
pub use raw::{RawEdge, RawGraph, RawNode};
