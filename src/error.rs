//! Unified error types for sbomgraph.
//!
//! Every failure in the graph → traversal → SBOM pipeline is fatal and
//! propagates to the caller; nothing here is retried or recovered locally.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sbomgraph operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SbomGraphError {
    /// The raw dependency data could not be acquired
    #[error("Dependency source unavailable for '{target}': {reason}")]
    SourceUnavailable { target: String, reason: String },

    /// The raw graph is internally inconsistent
    #[error("Malformed input graph: {context}")]
    MalformedInput {
        context: String,
        #[source]
        source: MalformedInputKind,
    },

    /// A traversal root is not present in the graph
    #[error("Unknown traversal root: '{root}'")]
    UnknownRoot { root: String },

    /// Two distinct nodes derived the same component identifier
    #[error(
        "Component identifier collision: '{id}' derived for both '{first_path}' and '{second_path}'"
    )]
    IdentityCollision {
        id: String,
        first_path: String,
        second_path: String,
    },

    /// The assembled document does not conform to the SBOM schema
    #[error("SBOM schema violation ({} problem(s)): {}", .violations.len(), .violations.join("; "))]
    SchemaViolation { violations: Vec<String> },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Input to the comparison utility could not be interpreted
    #[error("Comparison failed: {0}")]
    Comparison(String),
}

/// Specific malformed-input kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MalformedInputKind {
    #[error("edge {from} -> {to} references unknown node '{missing}'")]
    DanglingEdge {
        from: String,
        to: String,
        missing: String,
    },

    #[error("build target '{0}' is not a node of its own graph")]
    MissingRoot(String),

    #[error("node record with an empty path")]
    EmptyPath,

    #[error("invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("invalid YAML structure: {0}")]
    InvalidYaml(String),

    #[error("invalid table: {0}")]
    InvalidTable(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for sbomgraph operations
pub type Result<T> = std::result::Result<T, SbomGraphError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl SbomGraphError {
    /// Create a malformed-input error with context
    pub fn malformed(context: impl Into<String>, source: MalformedInputKind) -> Self {
        Self::MalformedInput {
            context: context.into(),
            source,
        }
    }

    /// Create a source-unavailable error
    pub fn source_unavailable(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown-root error
    pub fn unknown_root(root: impl Into<String>) -> Self {
        Self::UnknownRoot { root: root.into() }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a comparison error
    pub fn comparison(message: impl Into<String>) -> Self {
        Self::Comparison(message.into())
    }

    /// Returns true for errors caused by the raw input rather than by sbomgraph itself.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable { .. } | Self::MalformedInput { .. } | Self::UnknownRoot { .. }
        )
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for SbomGraphError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<std::fmt::Error> for SbomGraphError {
    fn from(err: std::fmt::Error) -> Self {
        Self::Io {
            path: None,
            message: "formatting output".to_string(),
            source: std::io::Error::other(err),
        }
    }
}

impl From<serde_json::Error> for SbomGraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(
            "JSON deserialization",
            MalformedInputKind::InvalidJson(err.to_string()),
        )
    }
}

impl From<serde_yaml::Error> for SbomGraphError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::malformed(
            "YAML deserialization",
            MalformedInputKind::InvalidYaml(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain outward, so an error raised deep in the model and
/// annotated on the way up reads `"outer: middle: inner"`.
///
/// ```ignore
/// use sbomgraph::error::ErrorContext;
///
/// let raw = source.fetch(target).context("acquiring raw graph")?;
/// let graph = DependencyGraph::build(raw, None)
///     .with_context(|| format!("building graph for {target}"))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<SbomGraphError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
///
/// Variants that carry structured identifiers (roots, ids, violations) are
/// passed through untouched so callers can still match on them.
fn add_context_to_error(err: SbomGraphError, new_ctx: &str) -> SbomGraphError {
    match err {
        SbomGraphError::MalformedInput {
            context: existing,
            source,
        } => SbomGraphError::MalformedInput {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomGraphError::SourceUnavailable { target, reason } => {
            SbomGraphError::SourceUnavailable {
                target,
                reason: chain_context(new_ctx, &reason),
            }
        }
        SbomGraphError::Io {
            path,
            message,
            source,
        } => SbomGraphError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        SbomGraphError::Config(msg) => SbomGraphError::Config(chain_context(new_ctx, &msg)),
        SbomGraphError::Comparison(msg) => {
            SbomGraphError::Comparison(chain_context(new_ctx, &msg))
        }
        other => other,
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an unknown-root error naming `root`.
    fn or_unknown_root(self, root: impl Into<String>) -> Result<T>;

    /// Convert None to a config error with context from a closure.
    fn with_config_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn or_unknown_root(self, root: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| SbomGraphError::unknown_root(root))
    }

    fn with_config_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| SbomGraphError::Config(f().into()))
    }
}
