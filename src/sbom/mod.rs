//! SBOM assembly.
//!
//! A [`ComponentSet`](crate::projection::ComponentSet) becomes a CycloneDX
//! 1.3 document with content-derived `bom-ref`s, one dependency entry per
//! component, and a serial number that only changes when the content does.
//! Documents that fail schema validation are never returned.

mod assembler;
pub mod cyclonedx;
mod identifiers;
mod metadata;
mod schema;

pub use assembler::{assemble, SbomAssembler};
pub use cyclonedx::{
    CycloneDxBom, CycloneDxComponent, CycloneDxDependency, CycloneDxMetadata, CycloneDxProperty,
    CycloneDxTool, PATH_PROPERTY,
};
pub use identifiers::{ContentHashScheme, IdentifierScheme, IdentityMap};
pub use metadata::SbomMetadata;
pub use schema::{CycloneDx13Validator, SchemaValidator};
