//! Configuration validation.

use super::types::{AppConfig, SbomConfig, SourceConfig};
use crate::source::SourceKind;

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.sbom.validate());
        errors.extend(self.source.validate());
        errors
    }
}

impl Validatable for SbomConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.tool_name.trim().is_empty() {
            errors.push(ConfigError::new("sbom.tool_name", "must not be empty"));
        }
        if self.tool_vendor.trim().is_empty() {
            errors.push(ConfigError::new("sbom.tool_vendor", "must not be empty"));
        }
        if let Some(ts) = &self.pin_timestamp {
            if chrono::DateTime::parse_from_rfc3339(ts).is_err() {
                errors.push(ConfigError::new(
                    "sbom.pin_timestamp",
                    format!("'{ts}' is not an RFC 3339 date-time"),
                ));
            }
        }
        errors
    }
}

impl Validatable for SourceConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let has_command = self.command.as_deref().is_some_and(|c| !c.trim().is_empty());
        match self.kind {
            SourceKind::Command if !has_command => {
                errors.push(ConfigError::new(
                    "source.command",
                    "required when source.kind is 'command'",
                ));
            }
            SourceKind::File if !self.args.is_empty() => {
                errors.push(ConfigError::new(
                    "source.args",
                    "only used when source.kind is 'command'",
                ));
            }
            _ => {}
        }
        errors
    }
}
