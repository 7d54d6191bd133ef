//! API request handlers
//!
//! The two conversion endpoints speak the exact wire shapes of the
//! contract: a `{message, records_processed}` envelope on ingest, raw
//! xlsx bytes on export, `{error}` bodies on failure. The info endpoints
//! use the standard [`ApiResponse`] wrapper.

use std::sync::Arc;

use axum::{
    extract::multipart::{Multipart, MultipartRejection},
    extract::rejection::JsonRejection,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::error::{ExportError, IngestError};
use crate::tabular::{read_dataset, write_workbook, SourceKind};
use crate::types::Dataset;

use super::server::AppState;

/// Multipart field expected to carry the upload.
pub const UPLOAD_FIELD: &str = "dataset_file";

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const EXPORT_DISPOSITION: &str = "attachment; filename=parent_submissions.xlsx";

/// Error body shared by every failure response.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let status = match self {
            IngestError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        if status.is_server_error() {
            let error_id = Uuid::new_v4();
            error!(%error_id, "ingest failed: {}", self);
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        match self {
            ExportError::EmptyData => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: self.to_string(),
                }),
            )
                .into_response(),
            // The detail stays server-side; the client gets a generic
            // message, unlike the ingest path which exposes it.
            ExportError::Failed(detail) => {
                let error_id = Uuid::new_v4();
                error!(%error_id, "export failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: "Failed to generate export. Please try again later.".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Ingest success envelope
#[derive(Serialize)]
pub struct IngestResponse {
    pub message: String,
    pub records_processed: Dataset,
}

/// POST /api/data - uploaded spreadsheet/CSV → JSON records
pub async fn ingest_data(multipart: Result<Multipart, MultipartRejection>) -> Response {
    // A request that is not multipart at all carries no file part.
    let Ok(mut multipart) = multipart else {
        return IngestError::MissingFile.into_response();
    };

    match extract_and_parse(&mut multipart).await {
        Ok(dataset) => Json(IngestResponse {
            message: "Data extracted successfully".to_string(),
            records_processed: dataset,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn extract_and_parse(multipart: &mut Multipart) -> Result<Dataset, IngestError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| IngestError::Processing(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        // A part without a filename attribute is a plain form field,
        // not an upload.
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if filename.is_empty() {
            return Err(IngestError::EmptyFilename);
        }
        let Some(kind) = SourceKind::from_filename(&filename) else {
            return Err(IngestError::UnsupportedType);
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|e| IngestError::Processing(e.to_string()))?;

        return read_dataset(kind, &bytes);
    }

    Err(IngestError::MissingFile)
}

/// Export request body
#[derive(Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub data: Option<Dataset>,
}

/// POST /export-data - JSON records → downloadable xlsx
pub async fn export_data(body: Result<Json<ExportRequest>, JsonRejection>) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        // A body that never parsed counts as an export failure, not a
        // validation error.
        Err(rejection) => return ExportError::Failed(rejection.to_string()).into_response(),
    };

    let dataset = match req.data {
        Some(d) if !d.is_empty() => d,
        _ => return ExportError::EmptyData.into_response(),
    };

    match write_workbook(&dataset) {
        Ok(buffer) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
                (header::CONTENT_DISPOSITION, EXPORT_DISPOSITION),
            ],
            buffer,
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Standard API response wrapper for the info endpoints
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Sheetbridge API Server".to_string(),
        version: state.version.clone(),
        description: "HTTP bridge between spreadsheet files and JSON records".to_string(),
        endpoints: vec![
            EndpointInfo {
                path: "/health".to_string(),
                method: "GET".to_string(),
                description: "Health check endpoint".to_string(),
            },
            EndpointInfo {
                path: "/version".to_string(),
                method: "GET".to_string(),
                description: "Get server version".to_string(),
            },
            EndpointInfo {
                path: "/api/data".to_string(),
                method: "POST".to_string(),
                description: "Upload a .csv/.xlsx/.xls file and get its rows as JSON".to_string(),
            },
            EndpointInfo {
                path: "/export-data".to_string(),
                method: "POST".to_string(),
                description: "Send JSON records and download a formatted .xlsx".to_string(),
            },
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec!["ingest".to_string(), "export".to_string()],
    }))
}
