//! SBOM command handler.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::AppConfig;
use crate::model::DocumentType;
use crate::pipeline::{
    build_source, exit_codes, generate_sbom, load_graph, metadata_from_config, write_output,
    OutputTarget,
};

/// Flags of the `sbom` subcommand.
#[derive(Debug, Clone, Default)]
pub struct SbomArgs {
    pub target: String,
    /// CycloneDX output path; stdout when unset
    pub cdx: Option<PathBuf>,
    pub document_type: Option<DocumentType>,
}

/// Run the sbom command
#[allow(clippy::needless_pass_by_value)]
pub fn run_sbom(args: SbomArgs, config: &AppConfig) -> Result<i32> {
    let source = build_source(&config.source)?;
    let graph = load_graph(source.as_ref(), &args.target)
        .with_context(|| format!("failed to load graph for {}", args.target))?;

    let document_type = args.document_type.unwrap_or(config.sbom.document_type);
    let metadata = metadata_from_config(&config.sbom)?;
    let bom = generate_sbom(&graph, document_type, &metadata)
        .with_context(|| format!("failed to assemble {document_type} SBOM"))?;
    info!(
        components = bom.components.len(),
        serial = bom.serial_number.as_deref().unwrap_or_default(),
        "SBOM assembled"
    );

    let json = bom.to_json_pretty()?;
    write_output(&json, &OutputTarget::from_option(args.cdx))?;
    Ok(exit_codes::SUCCESS)
}
