//! Comparison command handlers.
//!
//! Both commands print a report and return [`exit_codes::MISMATCH`] when the
//! two sides differ.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::compare::{compare_deps, compare_sboms, parse_uid};
use crate::config::AppConfig;
use crate::pipeline::{build_source, exit_codes, export_graph, load_graph, GraphRequest};
use crate::projection::OrderedTable;
use crate::reports::read_table;
use crate::sbom::CycloneDxBom;
use crate::traversal::DepthLimit;

fn read_sbom(path: &Path) -> Result<CycloneDxBom> {
    CycloneDxBom::from_path(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Run the compare-sboms command
pub fn run_compare_sboms(left: &Path, right: &Path, uid: &str, quiet: bool) -> Result<i32> {
    let uid = parse_uid(uid)?;
    let result = compare_sboms(&read_sbom(left)?, &read_sbom(right)?, &uid);
    if !quiet {
        print!("{result}");
    }
    Ok(if result.is_equal() {
        exit_codes::SUCCESS
    } else {
        exit_codes::MISMATCH
    })
}

/// Flags of the `compare-deps` subcommand.
///
/// Exactly one of `graph` (a CSV export) and `target` (exported on the fly)
/// must be set.
#[derive(Debug, Clone, Default)]
pub struct CompareDepsArgs {
    pub sbom: PathBuf,
    pub graph: Option<PathBuf>,
    pub target: Option<String>,
}

/// Run the compare-deps command
#[allow(clippy::needless_pass_by_value)]
pub fn run_compare_deps(args: CompareDepsArgs, config: &AppConfig, quiet: bool) -> Result<i32> {
    let sbom = read_sbom(&args.sbom)?;
    let table = match (&args.graph, &args.target) {
        (Some(path), None) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            read_table(&content).with_context(|| format!("failed to parse {}", path.display()))?
        }
        (None, Some(target)) => export_for(&sbom, target, config)?,
        _ => bail!("compare-deps needs exactly one of --graph and --target"),
    };

    let result = compare_deps(&sbom, &table);
    if !quiet {
        print!("{result}");
    }
    Ok(if result.is_equal() {
        exit_codes::SUCCESS
    } else {
        exit_codes::MISMATCH
    })
}

/// Export the full graph of `target` over the edge kinds the SBOM covers.
fn export_for(sbom: &CycloneDxBom, target: &str, config: &AppConfig) -> Result<OrderedTable> {
    let source = build_source(&config.source)?;
    let graph = load_graph(source.as_ref(), target)
        .with_context(|| format!("failed to load graph for {target}"))?;
    let request = GraphRequest {
        depth: DepthLimit::Unbounded,
        kind_filter: sbom.document_type().unwrap_or(config.sbom.document_type),
        inverse: None,
    };
    Ok(export_graph(&graph, &request)?)
}
