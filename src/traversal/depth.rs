//! Depth bounds.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Maximum number of hops a traversal walks from its roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DepthSetting", into = "DepthSetting")]
pub enum DepthLimit {
    /// At most this many hops; `0` keeps only the roots
    Bounded(usize),
    /// Walk the whole reachable component
    Unbounded,
}

impl DepthLimit {
    /// Whether a node at `depth` lies within the bound
    #[must_use]
    pub const fn admits(&self, depth: usize) -> bool {
        match self {
            Self::Bounded(max) => depth <= *max,
            Self::Unbounded => true,
        }
    }

    /// The next larger bound; unbounded stays unbounded.
    #[must_use]
    pub const fn deeper(&self) -> Self {
        match self {
            Self::Bounded(max) => Self::Bounded(max.saturating_add(1)),
            Self::Unbounded => Self::Unbounded,
        }
    }
}

impl Default for DepthLimit {
    fn default() -> Self {
        Self::Unbounded
    }
}

impl From<usize> for DepthLimit {
    fn from(max: usize) -> Self {
        Self::Bounded(max)
    }
}

impl fmt::Display for DepthLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(max) => write!(f, "{max}"),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

impl FromStr for DepthLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "unbounded" | "all" | "inf" => Ok(Self::Unbounded),
            _ => s.parse::<usize>().map(Self::Bounded).map_err(|_| {
                format!("invalid depth '{s}' (expected a non-negative integer or 'unbounded')")
            }),
        }
    }
}

/// Serialized form of a depth bound: a hop count or the word `unbounded`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DepthSetting {
    Hops(usize),
    Keyword(String),
}

impl TryFrom<DepthSetting> for DepthLimit {
    type Error = String;

    fn try_from(value: DepthSetting) -> Result<Self, Self::Error> {
        match value {
            DepthSetting::Hops(max) => Ok(Self::Bounded(max)),
            DepthSetting::Keyword(word) => word.parse(),
        }
    }
}

impl From<DepthLimit> for DepthSetting {
    fn from(value: DepthLimit) -> Self {
        match value {
            DepthLimit::Bounded(max) => Self::Hops(max),
            DepthLimit::Unbounded => Self::Keyword("unbounded".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("3".parse::<DepthLimit>().unwrap(), DepthLimit::Bounded(3));
        assert_eq!("ALL".parse::<DepthLimit>().unwrap(), DepthLimit::Unbounded);
        assert!("-1".parse::<DepthLimit>().is_err());
    }

    #[test]
    fn test_admits() {
        assert!(DepthLimit::Bounded(0).admits(0));
        assert!(!DepthLimit::Bounded(0).admits(1));
        assert!(DepthLimit::Unbounded.admits(usize::MAX));
    }

    #[test]
    fn test_serde_forms() {
        let bounded: DepthLimit = serde_yaml::from_str("2").unwrap();
        assert_eq!(bounded, DepthLimit::Bounded(2));
        let unbounded: DepthLimit = serde_yaml::from_str("unbounded").unwrap();
        assert_eq!(unbounded, DepthLimit::Unbounded);
        assert!(serde_yaml::from_str::<DepthLimit>("deep").is_err());
        assert_eq!(
            serde_json::to_string(&DepthLimit::Unbounded).unwrap(),
            "\"unbounded\""
        );
    }
}
