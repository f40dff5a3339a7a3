//! Graph command handler.
//!
//! Implements the `graph` subcommand: export the dependency graph of a build
//! target, or the inverse graph of the nodes a selector matches.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::model::KindFilter;
use crate::pipeline::{
    build_source, exit_codes, export_graph, load_graph, render_table, write_output,
    GraphRequest, OutputTarget,
};
use crate::reports::RenderMode;
use crate::traversal::DepthLimit;

/// Flags of the `graph` subcommand; unset values fall back to configuration.
#[derive(Debug, Clone, Default)]
pub struct GraphArgs {
    pub target: String,
    pub out: Option<PathBuf>,
    pub format: Option<RenderMode>,
    pub depth: Option<DepthLimit>,
    pub inverse: Option<String>,
    pub kind_filter: Option<KindFilter>,
}

/// Pick the render mode: explicit flag, then the output file extension, then
/// configuration, then CSV.
#[must_use]
pub fn resolve_format(
    explicit: Option<RenderMode>,
    configured: Option<RenderMode>,
    out: Option<&Path>,
) -> RenderMode {
    explicit
        .or_else(|| out.and_then(RenderMode::from_path))
        .or(configured)
        .unwrap_or_default()
}

/// Run the graph command
#[allow(clippy::needless_pass_by_value)]
pub fn run_graph(args: GraphArgs, config: &AppConfig) -> Result<i32> {
    let source = build_source(&config.source)?;
    let graph = load_graph(source.as_ref(), &args.target)
        .with_context(|| format!("failed to load graph for {}", args.target))?;

    let request = GraphRequest {
        depth: args.depth.unwrap_or(config.graph.depth),
        kind_filter: args.kind_filter.unwrap_or(config.graph.kind_filter),
        inverse: args.inverse,
    };
    let table = export_graph(&graph, &request)?;

    let mode = resolve_format(args.format, config.output.format, args.out.as_deref());
    let rendered = render_table(&table, mode)?;
    write_output(&rendered, &OutputTarget::from_option(args.out))?;
    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"{
        "root": "/s/a",
        "nodes": [
            {"path": "/s/a", "name": "a", "version": "1"},
            {"path": "/s/b", "name": "b", "version": "2"},
            {"path": "/s/c", "name": "c", "version": "3"}
        ],
        "edges": [
            {"from": "/s/a", "to": "/s/b", "kind": "runtime"},
            {"from": "/s/b", "to": "/s/c", "kind": "runtime"}
        ]
    }"#;

    #[test]
    fn test_resolve_format_precedence() {
        let dot = Some(Path::new("out.dot"));
        let txt = Some(Path::new("out.txt"));
        assert_eq!(resolve_format(None, None, None), RenderMode::Csv);
        assert_eq!(resolve_format(None, None, dot), RenderMode::Dot);
        assert_eq!(
            resolve_format(None, Some(RenderMode::Csv), dot),
            RenderMode::Dot
        );
        assert_eq!(
            resolve_format(None, Some(RenderMode::Dot), txt),
            RenderMode::Dot
        );
        assert_eq!(
            resolve_format(Some(RenderMode::Csv), None, dot),
            RenderMode::Csv
        );
        assert_eq!(
            resolve_format(Some(RenderMode::Dot), Some(RenderMode::Csv), None),
            RenderMode::Dot
        );
    }

    #[test]
    fn test_run_graph_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("graph.json");
        std::fs::write(&dump, DUMP).unwrap();
        let out = dir.path().join("graph.csv");

        let args = GraphArgs {
            target: dump.display().to_string(),
            out: Some(out.clone()),
            depth: Some(DepthLimit::Unbounded),
            ..GraphArgs::default()
        };
        let code = run_graph(args, &AppConfig::default()).unwrap();
        assert_eq!(code, exit_codes::SUCCESS);

        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written.lines().count(), 3, "{written}");
        assert!(written.contains("/s/b,/s/c,"), "{written}");
    }

    #[test]
    fn test_run_graph_out_extension_beats_configured_format() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("graph.json");
        std::fs::write(&dump, DUMP).unwrap();
        let out = dir.path().join("deps.dot");

        let mut config = AppConfig::default();
        config.output.format = Some(RenderMode::Csv);
        let args = GraphArgs {
            target: dump.display().to_string(),
            out: Some(out.clone()),
            ..GraphArgs::default()
        };
        run_graph(args, &config).unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        assert!(written.starts_with("digraph "), "{written}");
    }

    #[test]
    fn test_run_graph_missing_target_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("graph.csv");
        let args = GraphArgs {
            target: dir.path().join("absent.json").display().to_string(),
            out: Some(out.clone()),
            ..GraphArgs::default()
        };
        assert!(run_graph(args, &AppConfig::default()).is_err());
        assert!(!out.exists());
    }
}
