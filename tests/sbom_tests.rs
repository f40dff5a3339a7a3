//! Integration tests for SBOM assembly, schema conformance and comparison.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use sbomgraph::compare::{compare_deps, compare_sboms, parse_uid};
use sbomgraph::model::{DependencyGraph, DocumentType, KindFilter};
use sbomgraph::projection::{project_components, project_table};
use sbomgraph::sbom::{
    assemble, CycloneDx13Validator, CycloneDxBom, SbomMetadata, SchemaValidator, PATH_PROPERTY,
};
use sbomgraph::source::{GraphSource, JsonFileSource};
use sbomgraph::traversal::{traverse, TraversalQuery};

fn hello() -> DependencyGraph {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/hello.graph.json");
    let source = JsonFileSource::new();
    let raw = source.fetch(&path.display().to_string()).unwrap();
    DependencyGraph::build(raw, Some(&source)).unwrap()
}

fn pinned() -> SbomMetadata {
    SbomMetadata::default().pinned(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
}

fn sbom_for(graph: &DependencyGraph, document_type: DocumentType) -> CycloneDxBom {
    let root = graph.root_node().path().to_string();
    let query = TraversalQuery::forward().with_filter(document_type);
    let result = traverse(graph, &root, query).unwrap();
    assemble(&project_components(&result), document_type, &pinned()).unwrap()
}

const ALL_TYPES: [DocumentType; 3] = [
    DocumentType::Runtime,
    DocumentType::Buildtime,
    DocumentType::Both,
];

#[test]
fn component_counts_per_document_type() {
    let graph = hello();
    let counts: Vec<usize> = ALL_TYPES
        .iter()
        .map(|&t| sbom_for(&graph, t).components.len())
        .collect();
    assert_eq!(counts, vec![4, 5, 8]);
}

#[test]
fn documents_conform_to_cyclonedx_1_3() {
    let graph = hello();
    let validator = CycloneDx13Validator;
    for document_type in ALL_TYPES {
        let bom = sbom_for(&graph, document_type);
        let value = serde_json::to_value(&bom).unwrap();
        let violations = validator.validate(&value);
        assert!(violations.is_empty(), "{document_type}: {violations:?}");
        assert_eq!(bom.spec_version, "1.3");
        assert_eq!(bom.document_type(), Some(document_type));
    }
}

#[test]
fn dependencies_match_the_graph_export() {
    let graph = hello();
    let root = graph.root_node().path().to_string();
    for document_type in ALL_TYPES {
        let bom = sbom_for(&graph, document_type);
        let query = TraversalQuery::forward().with_filter(document_type);
        let table = project_table(&traverse(&graph, &root, query).unwrap());
        let comparison = compare_deps(&bom, &table);
        assert!(comparison.is_equal(), "{document_type}:\n{comparison}");
    }
}

#[test]
fn every_component_has_one_dependency_entry() {
    let graph = hello();
    let bom = sbom_for(&graph, DocumentType::Both);
    let refs: HashSet<&str> = bom.all_components().map(|c| c.bom_ref.as_str()).collect();
    let entries: Vec<&str> = bom
        .dependencies
        .iter()
        .map(|d| d.dependency_ref.as_str())
        .collect();
    assert_eq!(entries.len(), refs.len());
    assert_eq!(entries.iter().copied().collect::<HashSet<_>>(), refs);

    let primary = bom.metadata.as_ref().unwrap().component.as_ref().unwrap();
    assert_eq!(entries[0], primary.bom_ref);
    assert_eq!(primary.component_type, "application");
    assert_eq!(
        primary.property(PATH_PROPERTY),
        Some(graph.root_node().path())
    );
}

#[test]
fn assembly_is_reproducible() {
    let first = sbom_for(&hello(), DocumentType::Both);
    let second = sbom_for(&hello(), DocumentType::Both);
    assert_eq!(
        first.to_json_pretty().unwrap(),
        second.to_json_pretty().unwrap()
    );
}

#[test]
fn serial_number_tracks_content() {
    let graph = hello();
    let runtime = sbom_for(&graph, DocumentType::Runtime);
    let buildtime = sbom_for(&graph, DocumentType::Buildtime);
    assert_ne!(runtime.serial_number, buildtime.serial_number);

    let later = {
        let root = graph.root_node().path().to_string();
        let result = traverse(&graph, &root, TraversalQuery::forward()).unwrap();
        let metadata = SbomMetadata::default()
            .pinned(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
        assemble(&project_components(&result), KindFilter::Runtime, &metadata).unwrap()
    };
    assert_eq!(runtime.serial_number, later.serial_number);
    assert_ne!(runtime.metadata, later.metadata);
}

#[test]
fn written_document_reads_back_for_comparison() {
    let graph = hello();
    let dir = tempfile::tempdir().unwrap();
    let runtime_path = dir.path().join("runtime.cdx.json");
    let both_path = dir.path().join("both.cdx.json");
    std::fs::write(
        &runtime_path,
        sbom_for(&graph, DocumentType::Runtime).to_json_pretty().unwrap(),
    )
    .unwrap();
    std::fs::write(
        &both_path,
        sbom_for(&graph, DocumentType::Both).to_json_pretty().unwrap(),
    )
    .unwrap();

    let runtime = CycloneDxBom::from_path(&runtime_path).unwrap();
    let both = CycloneDxBom::from_path(&both_path).unwrap();
    let uid = parse_uid("name,version").unwrap();

    assert!(compare_sboms(&runtime, &runtime, &uid).is_equal());
    let comparison = compare_sboms(&runtime, &both, &uid);
    assert!(!comparison.is_equal());
    assert!(comparison.left_only.is_empty());
    assert_eq!(comparison.right_only.len(), 4);
}
