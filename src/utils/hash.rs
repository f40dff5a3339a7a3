//! Content hashing utilities.

use xxhash_rust::xxh3::{xxh3_128, xxh3_64};

/// Compute a content hash for arbitrary bytes
pub fn content_hash(data: &[u8]) -> u64 {
    xxh3_64(data)
}

/// 128-bit hash over a sequence of fields.
///
/// Fields are NUL-separated so `("ab", "c")` and `("a", "bc")` differ.
pub fn fields_hash128<'a>(fields: impl IntoIterator<Item = &'a str>) -> u128 {
    let mut buf = Vec::new();
    for field in fields {
        buf.extend_from_slice(field.as_bytes());
        buf.push(0);
    }
    xxh3_128(&buf)
}
