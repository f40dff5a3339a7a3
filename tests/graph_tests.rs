//! Integration tests for graph ingestion, traversal and table projection.
//!
//! The `hello` fixture is a small store-path graph: `hello` depends at
//! runtime on `glibc`, which pulls in `libidn2 → libunistring` and `xgcc`;
//! at build time it needs `stdenv` (with `bash` and `gcc-wrapper`, both
//! depending on `glibc`) and its source tarball.

use std::collections::HashSet;
use std::path::PathBuf;

use sbomgraph::error::{MalformedInputKind, SbomGraphError};
use sbomgraph::model::{DependencyGraph, EdgeKind, KindFilter, RawGraph, RawNode};
use sbomgraph::projection::project_table;
use sbomgraph::source::{GraphSource, JsonFileSource, StaticSource};
use sbomgraph::traversal::{select_roots, traverse, traverse_from, DepthLimit, TraversalQuery};

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .display()
        .to_string()
}

fn hello() -> DependencyGraph {
    let source = JsonFileSource::new();
    let raw = source.fetch(&fixture("hello.graph.json")).unwrap();
    DependencyGraph::build(raw, Some(&source)).unwrap()
}

fn names<'g>(graph: &'g DependencyGraph, paths: &HashSet<&'g str>) -> HashSet<&'g str> {
    paths
        .iter()
        .filter_map(|p| graph.find(p))
        .map(|idx| graph.node(idx).display_name())
        .collect()
}

#[test]
fn ingest_cleans_raw_records() {
    let graph = hello();
    assert_eq!(graph.node_count(), 9);
    assert_eq!(graph.edge_count(), 10);

    let stats = graph.stats();
    assert_eq!(stats.merged_nodes, 1);
    assert_eq!(stats.dropped_self_loops, 1);
    assert_eq!(stats.dropped_duplicates, 1);
    assert_eq!(stats.resolved_nodes, 0);

    assert_eq!(graph.root_node().name.as_deref(), Some("hello"));
}

#[test]
fn ingest_derives_missing_attributes_from_path() {
    let graph = hello();
    let xgcc = graph
        .nodes()
        .map(|(_, n)| n)
        .find(|n| n.path().ends_with("-xgcc-13.2.0-libgcc"))
        .unwrap();
    assert_eq!(xgcc.name.as_deref(), Some("xgcc"));
    assert_eq!(xgcc.version.as_deref(), Some("13.2.0-libgcc"));

    let stdenv = graph
        .nodes()
        .map(|(_, n)| n)
        .find(|n| n.path().ends_with("-stdenv-linux"))
        .unwrap();
    assert_eq!(stdenv.name.as_deref(), Some("stdenv-linux"));
    assert_eq!(stdenv.version, None);
}

#[test]
fn ingest_rejects_dangling_edge_without_resolver() {
    let source = JsonFileSource::new();
    let raw = source.fetch(&fixture("dangling.graph.json")).unwrap();
    match DependencyGraph::build(raw, Some(&source)) {
        Err(SbomGraphError::MalformedInput {
            source: MalformedInputKind::DanglingEdge { missing, .. },
            ..
        }) => assert!(missing.ends_with("-glibc-2.38-44"), "{missing}"),
        other => panic!("expected a dangling edge, got {other:?}"),
    }
}

#[test]
fn ingest_resolves_dangling_edge_on_demand() {
    let raw = RawGraph::new("/s/app")
        .node("/s/app", Some("app"), Some("1"))
        .edge("/s/app", "/s/lib", EdgeKind::Runtime);
    let source = StaticSource::new().with_extra_node(RawNode {
        path: "/s/lib".into(),
        name: Some("lib".into()),
        version: Some("2".into()),
    });
    let graph = DependencyGraph::build(raw, Some(&source)).unwrap();
    assert_eq!(graph.stats().resolved_nodes, 1);
    assert_eq!(graph.node(graph.find("/s/lib").unwrap()).label(), "lib@2");
}

#[test]
fn missing_source_file_is_unavailable() {
    let err = JsonFileSource::new()
        .fetch(&fixture("no-such.graph.json"))
        .unwrap_err();
    assert!(matches!(err, SbomGraphError::SourceUnavailable { .. }));
}

#[test]
fn forward_depth_one_lists_direct_dependencies() {
    let graph = hello();
    let root = graph.root_node().path().to_string();
    let result = traverse(&graph, &root, TraversalQuery::forward().with_depth(1)).unwrap();
    let table = project_table(&result);
    assert_eq!(table.len(), 1);
    assert!(table.rows()[0].dst_path.ends_with("-glibc-2.38-44"));
    assert_eq!(table.rows()[0].graph_depth, 1);
}

#[test]
fn forward_unbounded_runtime_closure() {
    let graph = hello();
    let root = graph.root_node().path().to_string();
    let result = traverse(&graph, &root, TraversalQuery::forward()).unwrap();
    let reached = result.node_paths();
    assert_eq!(
        names(&graph, &reached),
        HashSet::from(["hello", "glibc", "libidn2", "libunistring", "xgcc"])
    );
    assert_eq!(result.depth_of(graph.find(&root).unwrap()), Some(0));
    assert_eq!(project_table(&result).len(), 4);
}

#[test]
fn kind_filter_selects_edge_population() {
    let graph = hello();
    let root = graph.root_node().path().to_string();
    let run = |filter| {
        let query = TraversalQuery::forward().with_filter(filter);
        traverse(&graph, &root, query).unwrap()
    };

    let buildtime = run(KindFilter::Buildtime);
    assert_eq!(buildtime.len(), 6);
    assert_eq!(project_table(&buildtime).len(), 6);
    assert!(project_table(&buildtime)
        .rows()
        .iter()
        .all(|r| r.edge_kind == EdgeKind::Buildtime));

    let both = run(KindFilter::Both);
    assert_eq!(both.len(), 9);
    assert_eq!(project_table(&both).len(), 10);
}

#[test]
fn inverse_traversal_finds_dependents() {
    let graph = hello();
    let roots = select_roots(&graph, "libunistring").unwrap();
    let result = traverse_from(&graph, &roots, TraversalQuery::inverse()).unwrap();
    let reached = result.node_paths();
    assert_eq!(
        names(&graph, &reached),
        HashSet::from(["libunistring", "libidn2", "glibc", "hello"])
    );

    let table = project_table(&result);
    assert_eq!(table.len(), 3);
    assert!(table.rows()[0].dst_path.ends_with("-libunistring-1.1"));
}

#[test]
fn inverse_edges_are_the_forward_edges_among_ancestors() {
    let graph = hello();
    let root = graph.root_node().path().to_string();
    let forward = project_table(&traverse(&graph, &root, TraversalQuery::forward()).unwrap());

    let roots = select_roots(&graph, "libunistring").unwrap();
    let inverse_result = traverse_from(&graph, &roots, TraversalQuery::inverse()).unwrap();
    let ancestors = inverse_result.node_paths();
    let inverse = project_table(&inverse_result);

    let expected: HashSet<_> = forward
        .edge_set()
        .into_iter()
        .filter(|(src, dst, _)| ancestors.contains(src) && ancestors.contains(dst))
        .collect();
    assert_eq!(inverse.edge_set(), expected);
}

#[test]
fn forward_and_inverse_mirror_on_a_single_leaf_graph() {
    let source = JsonFileSource::new();
    let raw = source.fetch(&fixture("diamond.graph.yaml")).unwrap();
    let graph = DependencyGraph::build(raw, None).unwrap();

    let forward = traverse(&graph, "/s/a", TraversalQuery::forward()).unwrap();
    let inverse = traverse(&graph, "/s/e", TraversalQuery::inverse()).unwrap();
    assert_eq!(forward.node_paths(), inverse.node_paths());
    assert_eq!(
        project_table(&forward).edge_set(),
        project_table(&inverse).edge_set()
    );
}

#[test]
fn diamond_visits_shared_node_once_at_minimal_depth() {
    let source = JsonFileSource::new();
    let raw = source.fetch(&fixture("diamond.graph.yaml")).unwrap();
    let graph = DependencyGraph::build(raw, None).unwrap();
    let result = traverse(&graph, "/s/a", TraversalQuery::forward()).unwrap();

    let d = graph.find("/s/d").unwrap();
    assert_eq!(result.visits().iter().filter(|v| v.node == d).count(), 1);
    assert_eq!(result.depth_of(d), Some(2));
    assert_eq!(result.depth_of(graph.find("/s/e").unwrap()), Some(3));
    // both b→d and c→d are exported
    assert_eq!(project_table(&result).len(), 5);
}

#[test]
fn unknown_root_and_selector_failures() {
    let graph = hello();
    assert!(matches!(
        traverse(&graph, "/nix/store/missing", TraversalQuery::forward()),
        Err(SbomGraphError::UnknownRoot { .. })
    ));
    assert!(matches!(
        select_roots(&graph, "openssl"),
        Err(SbomGraphError::UnknownRoot { .. })
    ));
    assert!(matches!(
        select_roots(&graph, "("),
        Err(SbomGraphError::Config(_))
    ));
}

#[test]
fn repeated_export_is_byte_identical() {
    let graph = hello();
    let root = graph.root_node().path().to_string();
    let query = TraversalQuery::forward()
        .with_filter(KindFilter::Both)
        .with_depth(DepthLimit::Unbounded);
    let first = project_table(&traverse(&graph, &root, query).unwrap());
    let second = project_table(&traverse(&hello(), &root, query).unwrap());
    assert_eq!(first, second);
}
