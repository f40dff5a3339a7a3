//! Assembly of CycloneDX documents from component sets.

use std::collections::{BTreeSet, HashMap};

use packageurl::PackageUrl;
use petgraph::graph::NodeIndex;
use tracing::{debug, info};
use uuid::{Builder, Uuid};

use super::cyclonedx::{
    CycloneDxBom, CycloneDxComponent, CycloneDxDependency, CycloneDxMetadata, CycloneDxProperty,
    CycloneDxTool, DOCUMENT_TYPE_PROPERTY, PATH_PROPERTY, SPEC_VERSION,
};
use super::identifiers::{ContentHashScheme, IdentifierScheme, IdentityMap};
use super::metadata::SbomMetadata;
use super::schema::{CycloneDx13Validator, SchemaValidator};
use crate::error::{Result, SbomGraphError};
use crate::model::{DocumentType, Node};
use crate::projection::ComponentSet;
use crate::utils::fields_hash128;

/// Builds schema-valid SBOM documents.
///
/// Stateless between calls: identifiers come from the scheme, not from a
/// registry, so one assembler may serve any number of documents.
pub struct SbomAssembler {
    scheme: Box<dyn IdentifierScheme + Send + Sync>,
    validator: Box<dyn SchemaValidator + Send + Sync>,
}

impl Default for SbomAssembler {
    fn default() -> Self {
        Self {
            scheme: Box::new(ContentHashScheme),
            validator: Box::new(CycloneDx13Validator),
        }
    }
}

impl std::fmt::Debug for SbomAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SbomAssembler")
            .field("scheme", &self.scheme.name())
            .field("schema", &self.validator.schema_version())
            .finish()
    }
}

impl SbomAssembler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the identifier scheme
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl IdentifierScheme + Send + Sync + 'static) -> Self {
        self.scheme = Box::new(scheme);
        self
    }

    /// Replace the schema validator
    #[must_use]
    pub fn with_validator(
        mut self,
        validator: impl SchemaValidator + Send + Sync + 'static,
    ) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Assemble a document.
    ///
    /// The primary root becomes the metadata component; every other node is
    /// listed as a library component. Each component gets one dependency
    /// entry whose `dependsOn` holds its direct dependencies with parallel
    /// edge kinds collapsed. `document_type` is only recorded, never used to
    /// filter.
    pub fn assemble(
        &self,
        components: &ComponentSet<'_>,
        document_type: DocumentType,
        metadata: &SbomMetadata,
    ) -> Result<CycloneDxBom> {
        let primary = components
            .primary()
            .ok_or_else(|| SbomGraphError::unknown_root("<empty component set>"))?;

        let mut identities = IdentityMap::new();
        let mut ids: HashMap<NodeIndex, String> = HashMap::with_capacity(components.nodes().len());
        for &idx in components.nodes() {
            let id = identities.assign(self.scheme.as_ref(), components.node(idx))?;
            ids.insert(idx, id);
        }
        let id_of = |idx: NodeIndex| bom_ref_of(&ids, components, idx);

        let mut listed: Vec<(NodeIndex, CycloneDxComponent)> =
            Vec::with_capacity(ids.len().saturating_sub(1));
        for &idx in components.nodes() {
            if idx != primary {
                listed.push((idx, component(components.node(idx), id_of(idx)?, "library")));
            }
        }
        listed.sort_by(|a, b| a.1.bom_ref.cmp(&b.1.bom_ref));

        let primary_ref = id_of(primary)?.clone();
        let mut dependencies = Vec::with_capacity(ids.len());
        let entries = std::iter::once((primary, &primary_ref))
            .chain(listed.iter().map(|(idx, c)| (*idx, &c.bom_ref)));
        for (idx, bom_ref) in entries {
            let depends_on: BTreeSet<&String> = components
                .depends_on(idx)
                .map(id_of)
                .collect::<Result<_>>()?;
            dependencies.push(CycloneDxDependency {
                dependency_ref: bom_ref.clone(),
                depends_on: depends_on.into_iter().cloned().collect(),
            });
        }
        let listed: Vec<CycloneDxComponent> = listed.into_iter().map(|(_, c)| c).collect();

        let serial = serial_number(&primary_ref, &listed, &dependencies, document_type);
        let bom = CycloneDxBom {
            bom_format: "CycloneDX".to_string(),
            spec_version: SPEC_VERSION.to_string(),
            serial_number: Some(format!("urn:uuid:{serial}")),
            version: 1,
            metadata: Some(CycloneDxMetadata {
                timestamp: Some(metadata.timestamp_string()),
                tools: vec![CycloneDxTool {
                    vendor: Some(metadata.tool_vendor.clone()),
                    name: Some(metadata.tool_name.clone()),
                    version: Some(metadata.tool_version.clone()),
                }],
                component: Some(component(
                    components.node(primary),
                    &primary_ref,
                    "application",
                )),
                properties: vec![CycloneDxProperty::new(
                    DOCUMENT_TYPE_PROPERTY,
                    document_type.as_str(),
                )],
            }),
            components: listed,
            dependencies,
        };

        let value = serde_json::to_value(&bom)?;
        self.validator.ensure_valid(&value)?;
        debug!(scheme = self.scheme.name(), "document passed schema validation");
        info!(
            components = bom.components.len() + 1,
            relationships = bom.dependencies.iter().map(|d| d.depends_on.len()).sum::<usize>(),
            document_type = %document_type,
            "SBOM assembled"
        );
        Ok(bom)
    }
}

/// Assemble with the default identifier scheme and CycloneDX 1.3 validation.
pub fn assemble(
    components: &ComponentSet<'_>,
    document_type: DocumentType,
    metadata: &SbomMetadata,
) -> Result<CycloneDxBom> {
    SbomAssembler::default().assemble(components, document_type, metadata)
}

fn bom_ref_of<'a>(
    ids: &'a HashMap<NodeIndex, String>,
    components: &ComponentSet<'_>,
    idx: NodeIndex,
) -> Result<&'a String> {
    ids.get(&idx)
        .ok_or_else(|| SbomGraphError::unknown_root(components.node(idx).path().to_string()))
}

fn component(node: &Node, bom_ref: &str, component_type: &str) -> CycloneDxComponent {
    let name = node.display_name().to_string();
    let version = node.version.clone().unwrap_or_default();
    CycloneDxComponent {
        component_type: component_type.to_string(),
        bom_ref: bom_ref.to_string(),
        purl: purl(&name, &version),
        name,
        version,
        properties: vec![CycloneDxProperty::new(PATH_PROPERTY, node.path())],
    }
}

fn purl(name: &str, version: &str) -> Option<String> {
    let mut purl = PackageUrl::new("nix", name).ok()?;
    if !version.is_empty() {
        purl.with_version(version);
    }
    Some(purl.to_string())
}

/// Serial number derived from document content, stable across runs.
fn serial_number(
    primary: &str,
    components: &[CycloneDxComponent],
    dependencies: &[CycloneDxDependency],
    document_type: DocumentType,
) -> Uuid {
    let mut fields: Vec<&str> = vec![document_type.as_str(), primary];
    fields.extend(components.iter().map(|c| c.bom_ref.as_str()));
    for dependency in dependencies {
        fields.push(&dependency.dependency_ref);
        fields.extend(dependency.depends_on.iter().map(String::as_str));
        fields.push("");
    }
    let digest = fields_hash128(fields);
    Builder::from_random_bytes(digest.to_be_bytes()).into_uuid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DependencyGraph, EdgeKind, KindFilter, RawGraph};
    use crate::projection::project_components;
    use crate::traversal::{traverse, TraversalQuery};
    use chrono::TimeZone;
    use chrono::Utc;

    fn abc() -> DependencyGraph {
        let raw = RawGraph::new("/s/aaa-app-1.0")
            .node("/s/aaa-app-1.0", Some("app"), Some("1.0"))
            .node("/s/bbb-libb-2.0", Some("libb"), Some("2.0"))
            .node("/s/ccc-libc-3.0", Some("libc"), None)
            .edge("/s/aaa-app-1.0", "/s/bbb-libb-2.0", EdgeKind::Runtime)
            .edge("/s/bbb-libb-2.0", "/s/ccc-libc-3.0", EdgeKind::Runtime)
            .edge("/s/aaa-app-1.0", "/s/ccc-libc-3.0", EdgeKind::Buildtime)
            .edge("/s/aaa-app-1.0", "/s/bbb-libb-2.0", EdgeKind::Buildtime);
        DependencyGraph::build(raw, None).unwrap()
    }

    fn pinned() -> SbomMetadata {
        SbomMetadata::default().pinned(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    fn build(graph: &DependencyGraph, filter: KindFilter) -> CycloneDxBom {
        let query = TraversalQuery::forward().with_filter(filter);
        let result = traverse(graph, graph.root_node().path(), query).unwrap();
        assemble(&project_components(&result), filter, &pinned()).unwrap()
    }

    #[test]
    fn test_runtime_document_shape() {
        let graph = abc();
        let bom = build(&graph, KindFilter::Runtime);
        let meta = bom.metadata.as_ref().unwrap();
        let root = meta.component.as_ref().unwrap();
        assert_eq!(root.component_type, "application");
        assert_eq!(root.purl.as_deref(), Some("pkg:nix/app@1.0"));
        assert_eq!(bom.components.len(), 2);
        assert!(bom.components.iter().all(|c| c.component_type == "library"));
        assert_eq!(bom.dependencies.len(), 3);
        assert_eq!(bom.dependencies[0].dependency_ref, root.bom_ref);
        assert_eq!(bom.dependencies[0].depends_on.len(), 1);
        let libc = bom.components.iter().find(|c| c.name == "libc").unwrap();
        assert_eq!(libc.version, "");
        assert_eq!(libc.property(PATH_PROPERTY), Some("/s/ccc-libc-3.0"));
    }

    #[test]
    fn test_parallel_kinds_collapse_to_one_relationship() {
        let graph = abc();
        let bom = build(&graph, KindFilter::Both);
        let root_deps = &bom.dependencies[0].depends_on;
        assert_eq!(root_deps.len(), 2);
        let mut sorted = root_deps.clone();
        sorted.sort();
        assert_eq!(&sorted, root_deps);
    }

    #[test]
    fn test_identical_runs_identical_documents() {
        let graph = abc();
        let first = build(&graph, KindFilter::Runtime);
        let second = build(&graph, KindFilter::Runtime);
        assert_eq!(first, second);
        let other = build(&graph, KindFilter::Buildtime);
        assert_ne!(first.serial_number, other.serial_number);
    }

    #[test]
    fn test_output_validates() {
        let graph = abc();
        for filter in [KindFilter::Runtime, KindFilter::Buildtime, KindFilter::Both] {
            let bom = build(&graph, filter);
            let value = serde_json::to_value(&bom).unwrap();
            assert!(CycloneDx13Validator.validate(&value).is_empty());
        }
    }

    #[test]
    fn test_document_type_survives_serialization() {
        let graph = abc();
        for filter in [KindFilter::Runtime, KindFilter::Buildtime, KindFilter::Both] {
            let json = build(&graph, filter).to_json_pretty().unwrap();
            let read_back = CycloneDxBom::from_json_str(&json).unwrap();
            assert_eq!(read_back.document_type(), Some(filter));
        }
    }

    struct Constant;

    impl IdentifierScheme for Constant {
        fn derive(&self, _node: &Node) -> String {
            "same".to_string()
        }

        fn name(&self) -> &str {
            "constant"
        }
    }

    #[test]
    fn test_collision_is_fatal() {
        let graph = abc();
        let result = traverse(&graph, graph.root_node().path(), TraversalQuery::forward()).unwrap();
        let err = SbomAssembler::new()
            .with_scheme(Constant)
            .assemble(&project_components(&result), KindFilter::Runtime, &pinned())
            .unwrap_err();
        assert!(matches!(err, SbomGraphError::IdentityCollision { .. }));
    }

    struct RejectAll;

    impl SchemaValidator for RejectAll {
        fn schema_version(&self) -> &str {
            "none"
        }

        fn validate(&self, _document: &serde_json::Value) -> Vec<String> {
            vec!["rejected".to_string()]
        }
    }

    #[test]
    fn test_schema_failure_is_fatal() {
        let graph = abc();
        let result = traverse(&graph, graph.root_node().path(), TraversalQuery::forward()).unwrap();
        let err = SbomAssembler::new()
            .with_validator(RejectAll)
            .assemble(&project_components(&result), KindFilter::Runtime, &pinned())
            .unwrap_err();
        assert!(matches!(err, SbomGraphError::SchemaViolation { .. }));
    }
}
