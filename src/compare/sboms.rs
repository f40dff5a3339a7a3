//! Component-level comparison of two CycloneDX documents.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Result, SbomGraphError};
use crate::sbom::{CycloneDxBom, CycloneDxComponent};

/// Component attribute usable as part of the comparison key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UidField {
    Name,
    Version,
    BomRef,
    Purl,
}

impl UidField {
    fn value<'c>(&self, component: &'c CycloneDxComponent) -> &'c str {
        match self {
            Self::Name => &component.name,
            Self::Version => &component.version,
            Self::BomRef => &component.bom_ref,
            Self::Purl => component.purl.as_deref().unwrap_or(""),
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Version => "version",
            Self::BomRef => "bom-ref",
            Self::Purl => "purl",
        }
    }
}

impl FromStr for UidField {
    type Err = SbomGraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "name" => Ok(Self::Name),
            "version" => Ok(Self::Version),
            "bom-ref" | "bom_ref" => Ok(Self::BomRef),
            "purl" => Ok(Self::Purl),
            other => Err(SbomGraphError::comparison(format!(
                "unknown uid attribute '{other}' (expected name, version, bom-ref or purl)"
            ))),
        }
    }
}

/// Parse a comma-separated uid list such as `name,version`.
pub fn parse_uid(list: &str) -> Result<Vec<UidField>> {
    let fields: Vec<UidField> = list
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .collect::<Result<_>>()?;
    if fields.is_empty() {
        return Err(SbomGraphError::comparison("empty uid attribute list"));
    }
    Ok(fields)
}

type Key = Vec<String>;

/// Outcome of comparing two documents by component key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbomComparison {
    pub uid: Vec<UidField>,
    /// Distinct keys in the left document
    pub left_unique: usize,
    /// Distinct keys in the right document
    pub right_unique: usize,
    /// Keys occurring more than once on the left, with their counts
    pub left_non_unique: Vec<(Key, usize)>,
    pub right_non_unique: Vec<(Key, usize)>,
    pub common: Vec<Key>,
    pub left_only: Vec<Key>,
    pub right_only: Vec<Key>,
}

impl SbomComparison {
    /// True when neither side has components the other lacks
    #[must_use]
    pub fn is_equal(&self) -> bool {
        self.left_only.is_empty() && self.right_only.is_empty()
    }
}

fn key_counts(bom: &CycloneDxBom, uid: &[UidField]) -> BTreeMap<Key, usize> {
    let mut counts = BTreeMap::new();
    for component in bom.all_components() {
        let key: Key = uid.iter().map(|f| f.value(component).to_string()).collect();
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Compare the components of two documents, metadata component included.
#[must_use]
pub fn compare_sboms(left: &CycloneDxBom, right: &CycloneDxBom, uid: &[UidField]) -> SbomComparison {
    let left_counts = key_counts(left, uid);
    let right_counts = key_counts(right, uid);

    let non_unique = |counts: &BTreeMap<Key, usize>| -> Vec<(Key, usize)> {
        counts
            .iter()
            .filter(|(_, &n)| n > 1)
            .map(|(k, &n)| (k.clone(), n))
            .collect()
    };
    let common = left_counts
        .keys()
        .filter(|k| right_counts.contains_key(*k))
        .cloned()
        .collect();
    let left_only: Vec<Key> = left_counts
        .keys()
        .filter(|k| !right_counts.contains_key(*k))
        .cloned()
        .collect();
    let right_only: Vec<Key> = right_counts
        .keys()
        .filter(|k| !left_counts.contains_key(*k))
        .cloned()
        .collect();
    debug!(
        left_only = left_only.len(),
        right_only = right_only.len(),
        "compared documents"
    );

    SbomComparison {
        uid: uid.to_vec(),
        left_unique: left_counts.len(),
        right_unique: right_counts.len(),
        left_non_unique: non_unique(&left_counts),
        right_non_unique: non_unique(&right_counts),
        common,
        left_only,
        right_only,
    }
}

impl fmt::Display for SbomComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let uid: Vec<&str> = self.uid.iter().map(UidField::as_str).collect();
        writeln!(f, "Using uid: {}", uid.join(","))?;
        writeln!(f, "FILE1 unique components: {}", self.left_unique)?;
        write_keyed_counts(f, "FILE1 non-unique components", &self.left_non_unique)?;
        writeln!(f, "FILE2 unique components: {}", self.right_unique)?;
        write_keyed_counts(f, "FILE2 non-unique components", &self.right_non_unique)?;
        writeln!(f, "Common components: {}", self.common.len())?;
        write_keys(f, "FILE1 only components", &self.left_only)?;
        write_keys(f, "FILE2 only components", &self.right_only)
    }
}

fn write_keyed_counts(f: &mut fmt::Formatter<'_>, title: &str, rows: &[(Key, usize)]) -> fmt::Result {
    if rows.is_empty() {
        return Ok(());
    }
    writeln!(f, "{title}: {}", rows.len())?;
    for (key, count) in rows {
        writeln!(f, "  {} (x{count})", key.join(" "))?;
    }
    Ok(())
}

fn write_keys(f: &mut fmt::Formatter<'_>, title: &str, keys: &[Key]) -> fmt::Result {
    writeln!(f, "{title}: {}", keys.len())?;
    for key in keys {
        writeln!(f, "  {}", key.join(" "))?;
    }
    Ok(())
}
