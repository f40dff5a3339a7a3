//! Relationship-level comparison of an SBOM against a graph export.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::projection::OrderedTable;
use crate::sbom::{CycloneDxBom, PATH_PROPERTY};

type Pair = (String, String);

/// Dependency pairs present on only one side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepsComparison {
    pub sbom_pairs: usize,
    pub graph_pairs: usize,
    pub sbom_only: Vec<Pair>,
    pub graph_only: Vec<Pair>,
}

impl DepsComparison {
    #[must_use]
    pub fn is_equal(&self) -> bool {
        self.sbom_only.is_empty() && self.graph_only.is_empty()
    }
}

/// Compare the SBOM's `(dependent, dependency)` pairs, resolved to node paths,
/// with the `(src_path, dst_path)` pairs of a graph export.
///
/// A component without a path property is identified by its `bom-ref`.
#[must_use]
pub fn compare_deps(sbom: &CycloneDxBom, table: &OrderedTable) -> DepsComparison {
    let paths: HashMap<&str, &str> = sbom
        .all_components()
        .map(|c| {
            let path = c.property(PATH_PROPERTY).unwrap_or(&c.bom_ref);
            (c.bom_ref.as_str(), path)
        })
        .collect();
    let resolve = |r: &str| paths.get(r).copied().unwrap_or(r).to_string();

    let sbom_pairs: BTreeSet<Pair> = sbom
        .dependencies
        .iter()
        .flat_map(|d| {
            d.depends_on
                .iter()
                .map(move |t| (resolve(&d.dependency_ref), resolve(t)))
        })
        .collect();
    let graph_pairs: BTreeSet<Pair> = table
        .edge_pairs()
        .into_iter()
        .map(|(s, d)| (s.to_string(), d.to_string()))
        .collect();

    DepsComparison {
        sbom_pairs: sbom_pairs.len(),
        graph_pairs: graph_pairs.len(),
        sbom_only: sbom_pairs.difference(&graph_pairs).cloned().collect(),
        graph_only: graph_pairs.difference(&sbom_pairs).cloned().collect(),
    }
}

impl fmt::Display for DepsComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SBOM dependency pairs: {}", self.sbom_pairs)?;
        writeln!(f, "Graph dependency pairs: {}", self.graph_pairs)?;
        for (title, pairs) in [("SBOM only", &self.sbom_only), ("Graph only", &self.graph_only)] {
            writeln!(f, "{title}: {}", pairs.len())?;
            for (src, dst) in pairs {
                writeln!(f, "  {src} -> {dst}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EdgeKind;
    use crate::projection::TableRow;

    fn row(src: &str, dst: &str) -> TableRow {
        TableRow {
            src_path: src.into(),
            src_name: String::new(),
            src_version: String::new(),
            dst_path: dst.into(),
            dst_name: String::new(),
            dst_version: String::new(),
            edge_kind: EdgeKind::Runtime,
            graph_depth: 1,
        }
    }

    fn sbom() -> CycloneDxBom {
        serde_json::from_value(serde_json::json!({
            "bomFormat": "CycloneDX",
            "specVersion": "1.3",
            "metadata": {"component": {"type": "application", "bom-ref": "a-1", "name": "a", "version": "1",
                "properties": [{"name": "sbomgraph:path", "value": "/A"}]}},
            "components": [{"type": "library", "bom-ref": "b-1", "name": "b", "version": "1",
                "properties": [{"name": "sbomgraph:path", "value": "/B"}]}],
            "dependencies": [{"ref": "a-1", "dependsOn": ["b-1"]}, {"ref": "b-1"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_matching_pairs() {
        let table = OrderedTable::from_rows(vec![row("/A", "/B")]);
        let result = compare_deps(&sbom(), &table);
        assert!(result.is_equal(), "{result}");
        assert_eq!(result.sbom_pairs, 1);
    }

    #[test]
    fn test_differences_reported_both_ways() {
        let table = OrderedTable::from_rows(vec![row("/B", "/C")]);
        let result = compare_deps(&sbom(), &table);
        assert!(!result.is_equal());
        assert_eq!(result.sbom_only, vec![("/A".to_string(), "/B".to_string())]);
        assert_eq!(result.graph_only, vec![("/B".to_string(), "/C".to_string())]);
    }
}
