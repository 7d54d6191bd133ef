//! Tabular data conversion between file bytes and JSON records.
//!
//! `reader` handles the ingest direction (CSV/Excel bytes → [`Dataset`]),
//! `writer` the export direction (Dataset → xlsx buffer).
//!
//! [`Dataset`]: crate::types::Dataset

pub mod reader;
pub mod writer;

pub use reader::{read_dataset, SourceKind};
pub use writer::{format_header, write_workbook, SHEET_NAME};
