#![no_main]
use libfuzzer_sys::fuzz_target;
use sbomgraph::reports::{read_table, CsvRenderer, TableRenderer};

/// Fuzz the CSV edge-table reader.
///
/// A table that reads successfully must render and read back unchanged.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(table) = read_table(s) {
            let rendered = CsvRenderer.render(&table).unwrap_or_default();
            assert_eq!(read_table(&rendered).ok(), Some(table));
        }
    }
});
