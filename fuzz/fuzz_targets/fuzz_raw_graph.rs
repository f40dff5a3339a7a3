#![no_main]
use libfuzzer_sys::fuzz_target;
use sbomgraph::model::{DependencyGraph, KindFilter, RawGraph};
use sbomgraph::projection::{project_components, project_table};
use sbomgraph::sbom::{assemble, SbomMetadata};
use sbomgraph::traversal::{traverse_from, TraversalQuery};

/// Fuzz raw-graph ingestion and everything downstream of it.
///
/// Any dump that parses must either be rejected by graph construction or
/// survive traversal in both directions, projection and SBOM assembly
/// without panicking.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(raw) = RawGraph::from_json_str(s) else {
        return;
    };
    let Ok(graph) = DependencyGraph::build(raw, None) else {
        return;
    };
    for query in [
        TraversalQuery::forward().with_filter(KindFilter::Both),
        TraversalQuery::inverse().with_depth(2),
    ] {
        if let Ok(result) = traverse_from(&graph, &[graph.root()], query) {
            let _ = project_table(&result);
            let _ = assemble(
                &project_components(&result),
                query.kind_filter,
                &SbomMetadata::default(),
            );
        }
    }
});
