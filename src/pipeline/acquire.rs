//! Raw graph acquisition and graph construction.

use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::error::{ErrorContext, OptionContext, Result};
use crate::model::DependencyGraph;
use crate::source::{CommandSource, GraphSource, JsonFileSource, SourceKind};

/// Instantiate the configured source
pub fn build_source(config: &SourceConfig) -> Result<Box<dyn GraphSource>> {
    match config.kind {
        SourceKind::File => Ok(Box::new(JsonFileSource::new())),
        SourceKind::Command => {
            let program = config
                .command
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .with_config_context(|| "source.command is required for the command source")?;
            Ok(Box::new(
                CommandSource::new(program).with_args(config.args.iter().cloned()),
            ))
        }
    }
}

/// Fetch the raw graph for `target` and build it.
///
/// The source also resolves nodes that the fetched edges reference but the
/// node records omit.
pub fn load_graph(source: &dyn GraphSource, target: &str) -> Result<DependencyGraph> {
    info!(source = source.name(), target, "loading dependency graph");
    let raw = source.fetch(target)?;
    let graph = DependencyGraph::build(raw, Some(source))
        .with_context(|| format!("building graph for {target}"))?;
    debug!(hash = %format!("{:016x}", graph.content_hash()), "graph content hash");
    Ok(graph)
}
