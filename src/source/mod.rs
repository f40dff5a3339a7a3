//! Raw graph sources.
//!
//! A [`GraphSource`] hands over the complete dependency data for one build
//! target in a single synchronous call. Sources never retry or cache; an
//! acquisition failure surfaces as
//! [`SbomGraphError::SourceUnavailable`](crate::error::SbomGraphError::SourceUnavailable).

mod command;
mod file;
mod memory;

pub use command::CommandSource;
pub use file::JsonFileSource;
pub use memory::StaticSource;

use crate::error::Result;
use crate::model::{RawGraph, RawNode};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Provider of raw dependency data for a build target.
pub trait GraphSource {
    /// Fetch every node and edge record for `target`.
    fn fetch(&self, target: &str) -> Result<RawGraph>;

    /// Supply a single node record on demand.
    ///
    /// Called while building a graph for edges that name a path absent from
    /// the fetched node records. The default provider knows nothing extra.
    fn lookup_node(&self, _path: &str) -> Result<Option<RawNode>> {
        Ok(None)
    }

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// Which built-in source to use.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Target is a JSON or YAML raw-graph dump on disk
    #[default]
    File,
    /// Target is passed to an external program that prints the dump
    Command,
}
