//! End-to-end tests through the pipeline stages and command handlers.

use std::path::PathBuf;

use sbomgraph::cli::{run_compare_deps, run_graph, run_sbom, CompareDepsArgs, GraphArgs, SbomArgs};
use sbomgraph::config::{load_config_file, AppConfig};
use sbomgraph::model::KindFilter;
use sbomgraph::pipeline::{
    build_source, exit_codes, export_graph, generate_sbom, load_graph, render_table,
    GraphRequest,
};
use sbomgraph::reports::{read_table, RenderMode};
use sbomgraph::sbom::{CycloneDxBom, SbomMetadata};
use sbomgraph::traversal::DepthLimit;

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .display()
        .to_string()
}

#[test]
fn csv_export_reads_back_as_the_same_table() {
    let source = build_source(&AppConfig::default().source).unwrap();
    let graph = load_graph(source.as_ref(), &fixture("hello.graph.json")).unwrap();
    let request = GraphRequest {
        depth: DepthLimit::Unbounded,
        kind_filter: KindFilter::Both,
        inverse: None,
    };
    let table = export_graph(&graph, &request).unwrap();
    let csv = render_table(&table, RenderMode::Csv).unwrap();
    assert_eq!(read_table(&csv).unwrap(), table);
}

#[test]
fn dot_export_names_every_node() {
    let source = build_source(&AppConfig::default().source).unwrap();
    let graph = load_graph(source.as_ref(), &fixture("diamond.graph.yaml")).unwrap();
    let request = GraphRequest {
        depth: DepthLimit::Unbounded,
        ..GraphRequest::default()
    };
    let dot = render_table(&export_graph(&graph, &request).unwrap(), RenderMode::Dot).unwrap();
    for name in ["a", "b", "c", "d", "e"] {
        assert!(dot.contains(&format!("\"{name}\\n1.0\"")), "{name} missing:\n{dot}");
    }
}

#[test]
fn generated_sbom_matches_exported_graph_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let cdx = dir.path().join("hello.cdx.json");
    let csv = dir.path().join("hello.csv");
    let config = AppConfig::default();

    let sbom_args = SbomArgs {
        target: fixture("hello.graph.json"),
        cdx: Some(cdx.clone()),
        document_type: Some(KindFilter::Both),
    };
    assert_eq!(run_sbom(sbom_args, &config).unwrap(), exit_codes::SUCCESS);

    let graph_args = GraphArgs {
        target: fixture("hello.graph.json"),
        out: Some(csv.clone()),
        depth: Some(DepthLimit::Unbounded),
        kind_filter: Some(KindFilter::Both),
        ..GraphArgs::default()
    };
    assert_eq!(run_graph(graph_args, &config).unwrap(), exit_codes::SUCCESS);

    let compare = CompareDepsArgs {
        sbom: cdx.clone(),
        graph: Some(csv),
        target: None,
    };
    assert_eq!(
        run_compare_deps(compare, &config, true).unwrap(),
        exit_codes::SUCCESS
    );
    assert_eq!(CycloneDxBom::from_path(&cdx).unwrap().components.len(), 8);
}

#[test]
fn configuration_file_drives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join(".sbomgraph.yaml");
    std::fs::write(
        &config_path,
        "graph:\n  depth: unbounded\n  kind_filter: buildtime\nsbom:\n  document_type: both\n",
    )
    .unwrap();
    let config = load_config_file(&config_path).unwrap();
    assert_eq!(config.graph.depth, DepthLimit::Unbounded);

    let out = dir.path().join("deps.csv");
    let args = GraphArgs {
        target: fixture("hello.graph.json"),
        out: Some(out.clone()),
        ..GraphArgs::default()
    };
    run_graph(args, &config).unwrap();
    let table = read_table(&std::fs::read_to_string(out).unwrap()).unwrap();
    assert_eq!(table.len(), 6);
}

#[test]
fn failures_produce_no_document() {
    let dir = tempfile::tempdir().unwrap();
    let cdx = dir.path().join("out.cdx.json");
    let args = SbomArgs {
        target: fixture("dangling.graph.json"),
        cdx: Some(cdx.clone()),
        document_type: None,
    };
    assert!(run_sbom(args, &AppConfig::default()).is_err());
    assert!(!cdx.exists());
}

#[test]
fn concurrent_sbom_generation_shares_one_graph() {
    let source = build_source(&AppConfig::default().source).unwrap();
    let graph = load_graph(source.as_ref(), &fixture("hello.graph.json")).unwrap();
    let metadata = SbomMetadata::default();

    let serials: Vec<Option<String>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    generate_sbom(&graph, KindFilter::Runtime, &metadata)
                        .unwrap()
                        .serial_number
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(serials.windows(2).all(|w| w[0] == w[1]));
}
