//! Document-level metadata supplied by the caller.

use chrono::{DateTime, SecondsFormat, Utc};

/// Generation context recorded in the document metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbomMetadata {
    /// Generation time; `None` means "now"
    pub timestamp: Option<DateTime<Utc>>,
    pub tool_vendor: String,
    pub tool_name: String,
    pub tool_version: String,
}

impl Default for SbomMetadata {
    fn default() -> Self {
        Self {
            timestamp: None,
            tool_vendor: env!("CARGO_PKG_NAME").to_string(),
            tool_name: env!("CARGO_PKG_NAME").to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl SbomMetadata {
    /// Fix the generation time, for reproducible output
    #[must_use]
    pub const fn pinned(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn with_tool(mut self, vendor: impl Into<String>, name: impl Into<String>) -> Self {
        self.tool_vendor = vendor.into();
        self.tool_name = name.into();
        self
    }

    /// RFC 3339 timestamp with second precision
    #[must_use]
    pub fn timestamp_string(&self) -> String {
        self.timestamp
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
