//! Edge kinds and edge-kind filters.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Why one node depends on another.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Required for the artifact to execute
    Runtime,
    /// Required only to produce the artifact
    Buildtime,
}

impl EdgeKind {
    /// Lowercase label used in tables and logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Buildtime => "buildtime",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "runtime" => Ok(Self::Runtime),
            "buildtime" | "build" => Ok(Self::Buildtime),
            other => Err(format!(
                "unknown edge kind '{other}' (expected runtime or buildtime)"
            )),
        }
    }
}

/// Which edge kinds a traversal walks.
///
/// Doubles as the SBOM document type: a `runtime` SBOM is assembled from a
/// runtime-filtered traversal, and so on.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    /// Runtime edges only
    #[default]
    Runtime,
    /// Buildtime edges only
    Buildtime,
    /// Every edge
    Both,
}

impl KindFilter {
    /// Whether an edge of `kind` may be walked under this filter
    #[must_use]
    pub const fn admits(&self, kind: EdgeKind) -> bool {
        matches!(
            (self, kind),
            (Self::Both, _)
                | (Self::Runtime, EdgeKind::Runtime)
                | (Self::Buildtime, EdgeKind::Buildtime)
        )
    }

    /// Lowercase label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Buildtime => "buildtime",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for KindFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KindFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "runtime" => Ok(Self::Runtime),
            "buildtime" => Ok(Self::Buildtime),
            "both" | "all" => Ok(Self::Both),
            other => Err(format!(
                "unknown document type '{other}' (expected runtime, buildtime or both)"
            )),
        }
    }
}

/// SBOM document type; the same three-way choice as the traversal filter.
pub type DocumentType = KindFilter;
