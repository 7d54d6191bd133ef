//! Sheetbridge - HTTP bridge between spreadsheet files and JSON records
//!
//! Two stateless endpoints convert tabular data between file form and
//! JSON form:
//!
//! - Ingest (`POST /api/data`): multipart upload of a `.csv`/`.xlsx`/`.xls`
//!   file, returned as an ordered list of column → value records.
//! - Export (`POST /export-data`): JSON records, returned as a formatted
//!   `.xlsx` download with title-cased headers and auto-sized columns.
//!
//! # Example
//!
//! ```no_run
//! use sheetbridge::tabular::{read_dataset, write_workbook, SourceKind};
//!
//! let csv = b"first-name,last-name\nAnn,Lee\n";
//! let dataset = read_dataset(SourceKind::Csv, csv)?;
//! let xlsx_bytes = write_workbook(&dataset).expect("workbook");
//! # Ok::<(), sheetbridge::IngestError>(())
//! ```

pub mod api;
pub mod error;
pub mod tabular;
pub mod types;

// Re-export commonly used types
pub use error::{ExportError, IngestError};
pub use types::{Dataset, Record};
