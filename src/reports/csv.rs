//! CSV edge tables.
//!
//! Fields are quoted per RFC 4180 only when they contain a comma, a quote or
//! a line break.

use super::{RenderMode, TableRenderer};
use crate::error::{MalformedInputKind, Result, SbomGraphError};
use crate::model::EdgeKind;
use crate::projection::{OrderedTable, TableRow};

/// Column header written by [`CsvRenderer`]
pub const CSV_HEADER: [&str; 8] = [
    "src_path",
    "src_name",
    "src_version",
    "dst_path",
    "dst_name",
    "dst_version",
    "edge_kind",
    "graph_depth",
];

/// CSV table renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl CsvRenderer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TableRenderer for CsvRenderer {
    fn render(&self, table: &OrderedTable) -> Result<String> {
        let mut content = String::new();
        content.push_str(&CSV_HEADER.join(","));
        content.push('\n');

        for row in table.rows() {
            let depth = row.graph_depth.to_string();
            let fields: [&str; 8] = [
                row.src_path.as_str(),
                &row.src_name,
                &row.src_version,
                &row.dst_path,
                &row.dst_name,
                &row.dst_version,
                row.edge_kind.as_str(),
                &depth,
            ];
            let line: Vec<String> = fields.iter().map(|f| escape_csv(f)).collect();
            content.push_str(&line.join(","));
            content.push('\n');
        }
        Ok(content)
    }

    fn mode(&self) -> RenderMode {
        RenderMode::Csv
    }
}

fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn invalid(message: impl Into<String>) -> SbomGraphError {
    SbomGraphError::malformed("reading edge table", MalformedInputKind::InvalidTable(message.into()))
}

/// Split CSV text into records of fields, honouring quoted fields.
fn parse_records(content: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    if in_quotes {
        return Err(invalid("unterminated quoted field"));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records.retain(|r| !(r.len() == 1 && r[0].is_empty()));
    Ok(records)
}

/// Read an edge table written by [`CsvRenderer`].
///
/// Columns are located by header name; only `src_path` and `dst_path` are
/// required. A missing `edge_kind` reads as runtime, a missing depth as 0.
pub fn read_table(content: &str) -> Result<OrderedTable> {
    let mut records = parse_records(content)?.into_iter();
    let header = records.next().ok_or_else(|| invalid("missing header row"))?;
    let column = |name: &str| header.iter().position(|h| h.trim() == name);
    let src = column("src_path").ok_or_else(|| invalid("missing column 'src_path'"))?;
    let dst = column("dst_path").ok_or_else(|| invalid("missing column 'dst_path'"))?;
    let (src_name, src_version) = (column("src_name"), column("src_version"));
    let (dst_name, dst_version) = (column("dst_name"), column("dst_version"));
    let (kind, depth) = (column("edge_kind"), column("graph_depth"));

    let mut rows = Vec::new();
    for (line, record) in records.enumerate() {
        if record.len() != header.len() {
            return Err(invalid(format!(
                "row {} has {} fields, header has {}",
                line + 2,
                record.len(),
                header.len()
            )));
        }
        let get = |idx: Option<usize>| idx.map(|i| record[i].clone()).unwrap_or_default();
        let edge_kind = match kind {
            Some(i) => record[i]
                .parse::<EdgeKind>()
                .map_err(|e| invalid(format!("row {}: {e}", line + 2)))?,
            None => EdgeKind::Runtime,
        };
        let graph_depth = match depth {
            Some(i) => record[i]
                .trim()
                .parse::<usize>()
                .map_err(|e| invalid(format!("row {}: bad graph_depth: {e}", line + 2)))?,
            None => 0,
        };
        rows.push(TableRow {
            src_path: record[src].clone(),
            src_name: get(src_name),
            src_version: get(src_version),
            dst_path: record[dst].clone(),
            dst_name: get(dst_name),
            dst_version: get(dst_version),
            edge_kind,
            graph_depth,
        });
    }
    Ok(OrderedTable::from_rows(rows))
}
