use thiserror::Error;

/// Failures on the file-to-JSON path.
///
/// The `Display` text of the 400-class variants is the exact message
/// returned to the client. `Processing` carries the underlying parser
/// message and is surfaced verbatim in the 500 body.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("No file part in the request")]
    MissingFile,

    #[error("No file selected")]
    EmptyFilename,

    #[error("File type not allowed. Please upload .xlsx, .xls, or .csv files.")]
    UnsupportedType,

    #[error("The file is empty or corrupt")]
    EmptyOrCorrupt,

    #[error("Error processing file: {0}")]
    Processing(String),
}

/// Failures on the JSON-to-file path.
///
/// Unlike ingest, the detail inside `Failed` never reaches the client;
/// it is logged server-side and the response body stays generic.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No data to export")]
    EmptyData,

    #[error("export failed: {0}")]
    Failed(String),
}
