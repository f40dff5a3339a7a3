//! Content-derived component identifiers.
//!
//! Identifiers are a pure function of a node's `(path, name, version)`, so
//! the same node gets the same `bom-ref` in every run against unchanged
//! input. No registry or counter is shared between runs.

use std::collections::HashMap;

use crate::error::{Result, SbomGraphError};
use crate::model::Node;
use crate::utils::fields_hash128;

/// Derives a component identifier from a node.
pub trait IdentifierScheme {
    /// Identifier for `node`; must be deterministic
    fn derive(&self, node: &Node) -> String;

    /// Scheme name for logs
    fn name(&self) -> &str;
}

/// `<name>-<version>-<16 hex digits of xxh3-128(path, name, version)>`.
///
/// The version segment is left out when the node has none.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentHashScheme;

impl IdentifierScheme for ContentHashScheme {
    fn derive(&self, node: &Node) -> String {
        let name = node.display_name();
        let version = node.version.as_deref().unwrap_or("");
        let digest = fields_hash128([node.path(), name, version]);
        let short = (digest >> 64) as u64 ^ digest as u64;
        if version.is_empty() {
            format!("{name}-{short:016x}")
        } else {
            format!("{name}-{version}-{short:016x}")
        }
    }

    fn name(&self) -> &str {
        "content-hash"
    }
}

/// Tracks assigned identifiers within one document and rejects collisions.
#[derive(Debug, Default)]
pub struct IdentityMap {
    by_id: HashMap<String, String>,
}

impl IdentityMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive and record the identifier for `node`.
    ///
    /// Re-assigning the same node is a no-op; a different path landing on an
    /// already used identifier is an [`SbomGraphError::IdentityCollision`].
    pub fn assign(&mut self, scheme: &dyn IdentifierScheme, node: &Node) -> Result<String> {
        let id = scheme.derive(node);
        match self.by_id.get(&id) {
            Some(existing) if existing != node.path() => Err(SbomGraphError::IdentityCollision {
                id,
                first_path: existing.clone(),
                second_path: node.path().to_string(),
            }),
            Some(_) => Ok(id),
            None => {
                self.by_id.insert(id.clone(), node.path().to_string());
                Ok(id)
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
