//! Graphviz DOT export.

use std::collections::HashSet;
use std::fmt::Write as _;

use super::{RenderMode, TableRenderer};
use crate::error::Result;
use crate::model::EdgeKind;
use crate::projection::OrderedTable;

/// DOT renderer; buildtime edges are drawn dashed.
#[derive(Debug, Clone, Default)]
pub struct DotRenderer {
    graph_name: String,
}

impl DotRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph_name: "dependencies".to_string(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.graph_name = name.into();
        self
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn label(name: &str, version: &str, path: &str) -> String {
    let name = if name.is_empty() { path } else { name };
    if version.is_empty() {
        name.to_string()
    } else {
        format!("{name}\n{version}")
    }
}

impl TableRenderer for DotRenderer {
    fn render(&self, table: &OrderedTable) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "digraph {} {{", quote(&self.graph_name))?;
        writeln!(out, "  rankdir=LR;")?;
        writeln!(
            out,
            "  node [shape=box, style=\"rounded,filled\", fillcolor=\"#EEEEEE\", fontsize=10];"
        )?;

        let mut declared = HashSet::new();
        for row in table.rows() {
            for (path, name, version) in [
                (&row.src_path, &row.src_name, &row.src_version),
                (&row.dst_path, &row.dst_name, &row.dst_version),
            ] {
                if declared.insert(path.as_str()) {
                    writeln!(
                        out,
                        "  {} [label={}];",
                        quote(path),
                        quote(&label(name, version, path))
                    )?;
                }
            }
        }
        for row in table.rows() {
            let style = match row.edge_kind {
                EdgeKind::Runtime => "solid",
                EdgeKind::Buildtime => "dashed",
            };
            writeln!(
                out,
                "  {} -> {} [style={style}];",
                quote(&row.src_path),
                quote(&row.dst_path)
            )?;
        }
        writeln!(out, "}}")?;
        Ok(out)
    }

    fn mode(&self) -> RenderMode {
        RenderMode::Dot
    }
}
