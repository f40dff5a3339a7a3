//! Graph nodes: one package or artifact identity per unique path.

use crate::utils::split_store_name;
use serde::{Deserialize, Serialize};

/// A unique package/artifact identity.
///
/// Identity is the `path` alone; `name` and `version` are descriptive and may
/// be missing for malformed inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Canonical unique identifier, fixed at ingestion
    path: String,
    /// Package name
    pub name: Option<String>,
    /// Package version
    pub version: Option<String>,
}

impl Node {
    /// Create a node with no attributes
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            version: None,
        }
    }

    /// Set the name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// The canonical path
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Merge attributes from a later record for the same path.
    ///
    /// Later non-empty values win; empty or absent values never erase what
    /// is already known. Returns true if anything changed.
    pub fn merge_attributes(&mut self, name: Option<&str>, version: Option<&str>) -> bool {
        let mut changed = false;
        if let Some(name) = non_empty(name) {
            if self.name.as_deref() != Some(name) {
                self.name = Some(name.to_string());
                changed = true;
            }
        }
        if let Some(version) = non_empty(version) {
            if self.version.as_deref() != Some(version) {
                self.version = Some(version.to_string());
                changed = true;
            }
        }
        changed
    }

    /// Fill a missing name/version from the path's last segment.
    pub fn derive_missing_attributes(&mut self) {
        if self.name.is_some() && self.version.is_some() {
            return;
        }
        let (name, version) = split_store_name(&self.path);
        if self.name.is_none() {
            self.name = non_empty(Some(name)).map(str::to_string);
        }
        if self.version.is_none() {
            self.version = version.map(str::to_string);
        }
    }

    /// Name for display, falling back to the path
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.path)
    }

    /// `name@version` label when both are known
    #[must_use]
    pub fn label(&self) -> String {
        match &self.version {
            Some(v) => format!("{}@{v}", self.display_name()),
            None => self.display_name().to_string(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
