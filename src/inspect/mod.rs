//! Image inspection: folder scanning and per-file metadata.

pub mod header;
mod inspector;
mod scan;

pub use inspector::{analyze, analyze_all};
pub use scan::{scan_folder, validate_folder};
