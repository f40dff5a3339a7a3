//! Tabular export of traversal results.
//!
//! Two renderers are provided:
//! - CSV: one row per edge, for spreadsheets and the comparison utility
//! - DOT: Graphviz source; rasterising it to an image is left to Graphviz
//!
//! Both consume an [`OrderedTable`] and preserve its row order.

mod csv;
mod dot;
mod types;

pub use csv::{read_table, CsvRenderer, CSV_HEADER};
pub use dot::DotRenderer;
pub use types::RenderMode;

use std::io::Write;

use crate::error::Result;
use crate::projection::OrderedTable;

/// Renders an ordered table into a text format.
pub trait TableRenderer {
    /// Render the whole table
    fn render(&self, table: &OrderedTable) -> Result<String>;

    /// Render into a writer
    fn write_to(&self, table: &OrderedTable, writer: &mut dyn Write) -> Result<()> {
        let rendered = self.render(table)?;
        writer.write_all(rendered.as_bytes())?;
        Ok(())
    }

    /// The mode this renderer produces
    fn mode(&self) -> RenderMode;
}

/// Create a renderer for the given mode
#[must_use]
pub fn create_renderer(mode: RenderMode) -> Box<dyn TableRenderer> {
    match mode {
        RenderMode::Csv => Box::new(CsvRenderer::new()),
        RenderMode::Dot => Box::new(DotRenderer::new()),
    }
}
