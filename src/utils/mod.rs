//! Shared utilities.

mod hash;
mod store_path;

pub use hash::{content_hash, fields_hash128};
pub use store_path::split_store_name;
