//! Render mode definitions.

use std::path::Path;

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for graph exports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Comma-separated edge table
    #[default]
    Csv,
    /// Graphviz DOT source
    #[value(alias = "gv")]
    Dot,
}

impl RenderMode {
    /// Mode implied by a file extension, if any
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "dot" | "gv" => Some(Self::Dot),
            _ => None,
        }
    }
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Dot => write!(f, "dot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(RenderMode::from_path(Path::new("g.CSV")), Some(RenderMode::Csv));
        assert_eq!(RenderMode::from_path(Path::new("out/g.gv")), Some(RenderMode::Dot));
        assert_eq!(RenderMode::from_path(Path::new("g.png")), None);
        assert_eq!(RenderMode::from_path(Path::new("graph")), None);
    }
}
