//! CycloneDX 1.3 JSON document model.
//!
//! Written by the assembler and read back by the comparison utility, so
//! every optional field defaults when absent.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorContext, Result, SbomGraphError};
use crate::model::DocumentType;

/// Spec version written into every document
pub const SPEC_VERSION: &str = "1.3";

/// Property name carrying the node path on each component
pub const PATH_PROPERTY: &str = "sbomgraph:path";

/// Property name carrying the document type in the metadata
pub const DOCUMENT_TYPE_PROPERTY: &str = "sbomgraph:document_type";

/// CycloneDX BOM structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycloneDxBom {
    /// BOM format (always "CycloneDX")
    pub bom_format: String,

    /// Spec version
    pub spec_version: String,

    /// Serial number (`urn:uuid:...`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    /// BOM version
    #[serde(default = "default_bom_version")]
    pub version: u32,

    /// Metadata about the BOM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CycloneDxMetadata>,

    /// Components in the BOM
    #[serde(default)]
    pub components: Vec<CycloneDxComponent>,

    /// Dependency relationships
    #[serde(default)]
    pub dependencies: Vec<CycloneDxDependency>,
}

const fn default_bom_version() -> u32 {
    1
}

/// Metadata about the BOM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycloneDxMetadata {
    /// Timestamp of generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Tools used to generate the BOM
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<CycloneDxTool>,

    /// The build target the BOM describes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<CycloneDxComponent>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<CycloneDxProperty>,
}

impl CycloneDxMetadata {
    /// Value of the first document-level property named `name`
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

/// Tool information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycloneDxTool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A component in the CycloneDX BOM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycloneDxComponent {
    /// Component type
    #[serde(rename = "type")]
    pub component_type: String,

    /// BOM reference (unique ID)
    #[serde(rename = "bom-ref", default)]
    pub bom_ref: String,

    /// Component name
    pub name: String,

    /// Component version; required by 1.3, empty when unknown
    #[serde(default)]
    pub version: String,

    /// Package URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<CycloneDxProperty>,
}

impl CycloneDxComponent {
    /// Value of the first property named `name`
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

/// Name/value property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycloneDxProperty {
    pub name: String,
    pub value: String,
}

impl CycloneDxProperty {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One dependency entry: `ref` directly depends on each of `dependsOn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycloneDxDependency {
    #[serde(rename = "ref")]
    pub dependency_ref: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl CycloneDxBom {
    /// Metadata component followed by every listed component
    pub fn all_components(&self) -> impl Iterator<Item = &CycloneDxComponent> {
        self.metadata
            .as_ref()
            .and_then(|m| m.component.as_ref())
            .into_iter()
            .chain(self.components.iter())
    }

    /// Document type recorded by the assembler, if any
    #[must_use]
    pub fn document_type(&self) -> Option<DocumentType> {
        self.metadata
            .as_ref()?
            .property(DOCUMENT_TYPE_PROPERTY)?
            .parse()
            .ok()
    }

    /// Parse a document from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let bom: Self = serde_json::from_str(content)?;
        if bom.bom_format != "CycloneDX" {
            return Err(SbomGraphError::comparison(format!(
                "not a CycloneDX document (bomFormat '{}')",
                bom.bom_format
            )));
        }
        Ok(bom)
    }

    /// Read a document from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SbomGraphError::io(path, e))?;
        Self::from_json_str(&content).with_context(|| format!("reading {}", path.display()))
    }

    /// Pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
