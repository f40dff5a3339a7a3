//! SBOM generation stage.

use chrono::{DateTime, Utc};

use crate::config::SbomConfig;
use crate::error::{Result, SbomGraphError};
use crate::model::{DependencyGraph, DocumentType};
use crate::projection::project_components;
use crate::sbom::{assemble, CycloneDxBom, SbomMetadata};
use crate::traversal::{traverse_from, TraversalQuery};

/// Metadata described by the SBOM configuration section
pub fn metadata_from_config(config: &SbomConfig) -> Result<SbomMetadata> {
    let mut metadata =
        SbomMetadata::default().with_tool(config.tool_vendor.clone(), config.tool_name.clone());
    if let Some(ts) = &config.pin_timestamp {
        let pinned = DateTime::parse_from_rfc3339(ts).map_err(|e| {
            SbomGraphError::config(format!("sbom.pin_timestamp '{ts}': {e}"))
        })?;
        metadata = metadata.pinned(pinned.with_timezone(&Utc));
    }
    Ok(metadata)
}

/// Build an SBOM covering everything reachable from the target over the
/// edge kinds `document_type` names.
pub fn generate_sbom(
    graph: &DependencyGraph,
    document_type: DocumentType,
    metadata: &SbomMetadata,
) -> Result<CycloneDxBom> {
    let query = TraversalQuery::forward().with_filter(document_type);
    let result = traverse_from(graph, &[graph.root()], query)?;
    assemble(&project_components(&result), document_type, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeKind, RawGraph};

    #[test]
    fn test_metadata_from_config() {
        let config = SbomConfig {
            pin_timestamp: Some("2024-05-01T10:00:00+02:00".into()),
            ..SbomConfig::default()
        };
        let metadata = metadata_from_config(&config).unwrap();
        assert_eq!(metadata.timestamp_string(), "2024-05-01T08:00:00Z");

        let bad = SbomConfig {
            pin_timestamp: Some("soon".into()),
            ..SbomConfig::default()
        };
        assert!(metadata_from_config(&bad).is_err());
    }

    #[test]
    fn test_generate_sbom_by_document_type() {
        let raw = RawGraph::new("A")
            .node("A", Some("a"), Some("1"))
            .node("B", Some("b"), Some("1"))
            .node("C", Some("c"), Some("1"))
            .edge("A", "B", EdgeKind::Runtime)
            .edge("B", "C", EdgeKind::Runtime)
            .edge("A", "C", EdgeKind::Buildtime);
        let graph = DependencyGraph::build(raw, None).unwrap();
        let metadata = SbomMetadata::default();

        let runtime = generate_sbom(&graph, DocumentType::Runtime, &metadata).unwrap();
        assert_eq!(runtime.components.len(), 2);
        let buildtime = generate_sbom(&graph, DocumentType::Buildtime, &metadata).unwrap();
        assert_eq!(buildtime.components.len(), 1);
        let both = generate_sbom(&graph, DocumentType::Both, &metadata).unwrap();
        assert_eq!(both.components.len(), 2);
    }
}
