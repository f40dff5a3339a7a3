//! Raw-graph dumps read from disk.

use std::path::Path;

use tracing::debug;

use super::GraphSource;
use crate::error::{ErrorContext, Result, SbomGraphError};
use crate::model::RawGraph;

/// Reads the target as a raw-graph dump.
///
/// Files ending in `.yaml`/`.yml` are parsed as YAML, everything else as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileSource;

impl JsonFileSource {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl GraphSource for JsonFileSource {
    fn fetch(&self, target: &str) -> Result<RawGraph> {
        let path = Path::new(target);
        let content = std::fs::read_to_string(path)
            .map_err(|e| SbomGraphError::source_unavailable(target, e.to_string()))?;
        debug!(target, bytes = content.len(), "read raw graph dump");

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        let parsed = if is_yaml {
            RawGraph::from_yaml_str(&content)
        } else {
            RawGraph::from_json_str(&content)
        };
        parsed.with_context(|| format!("parsing {target}"))
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = JsonFileSource::new()
            .fetch("/definitely/not/here.json")
            .unwrap_err();
        assert!(matches!(err, SbomGraphError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_reads_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("g.json");
        std::fs::write(&json, r#"{"root": "A", "nodes": [{"path": "A"}]}"#).unwrap();
        let raw = JsonFileSource::new().fetch(json.to_str().unwrap()).unwrap();
        assert_eq!(raw.root, "A");

        let yaml = dir.path().join("g.yml");
        let mut f = std::fs::File::create(&yaml).unwrap();
        writeln!(f, "root: B\nnodes:\n  - path: B").unwrap();
        let raw = JsonFileSource::new().fetch(yaml.to_str().unwrap()).unwrap();
        assert_eq!(raw.root, "B");
    }

    #[test]
    fn test_garbage_is_malformed_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[1, 2").unwrap();
        match JsonFileSource::new().fetch(path.to_str().unwrap()) {
            Err(SbomGraphError::MalformedInput { context, .. }) => {
                assert!(context.starts_with("parsing "), "{context}");
            }
            other => panic!("expected malformed input, got {other:?}"),
        }
    }
}
