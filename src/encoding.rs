//! Encoding normalizer: repairs BOM-prefixed and UTF-16LE JSON files in place.

mod batch;
mod detect;
mod normalize;

pub use batch::{normalize_dir, normalize_files, BatchEntry, BatchReport, BatchResult};
pub use detect::{decode, SourceEncoding};
pub use normalize::{normalize_bytes, normalize_file, NormalizeOutcome, Normalized};
