//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ErrorKind, XlError};
use crate::excel::{read_multiple_workbooks, ExcelExporter};
use crate::types::{MissingKeyPolicy, RecordSet, WriteOptions, DEFAULT_SHEET_NAME};

use super::server::AppState;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Standard API response wrapper
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

    pub fn err(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// HTTP status for a library error
pub fn status_for(err: &XlError) -> StatusCode {
    match err.kind() {
        ErrorKind::InvalidInput | ErrorKind::KeyNotFound | ErrorKind::MalformedInput => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::DataConversionFailure => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::IoFailure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<()>::err(message))).into_response()
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

fn endpoint(path: &str, method: &str, description: &str) -> EndpointInfo {
    EndpointInfo {
        path: path.to_string(),
        method: method.to_string(),
        description: description.to_string(),
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "xlrecords API Server".to_string(),
        version: state.version.clone(),
        description: "Spreadsheet <-> record conversion over HTTP".to_string(),
        endpoints: vec![
            endpoint("/health", "GET", "Health check endpoint"),
            endpoint("/version", "GET", "Get server version"),
            endpoint(
                "/api/v1/read",
                "POST",
                "Read the first sheet of each workbook into records",
            ),
            endpoint(
                "/api/v1/generate",
                "POST",
                "Generate an .xlsx workbook from a JSON array of objects",
            ),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
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
        features: vec!["read".to_string(), "generate".to_string()],
    }))
}

/// Read request
#[derive(Deserialize)]
pub struct ReadRequest {
    pub file_paths: Vec<String>,
}

/// Read response
#[derive(Serialize, Default)]
pub struct ReadResponse {
    pub record_count: usize,
    pub records: RecordSet,
}

/// POST /api/v1/read - Read workbooks into records
pub async fn read(Json(req): Json<ReadRequest>) -> Response {
    let paths: Vec<PathBuf> = req.file_paths.iter().map(PathBuf::from).collect();

    let result = tokio::task::spawn_blocking(move || read_multiple_workbooks(&paths)).await;

    match result {
        Ok(Ok(records)) => Json(ApiResponse::ok(ReadResponse {
            record_count: records.len(),
            records,
        }))
        .into_response(),
        Ok(Err(e)) => error_response(status_for(&e), e.to_string()),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("read task failed: {}", e),
        ),
    }
}

/// Generate query parameters
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct GenerateParams {
    pub sheet_name: Option<String>,
    pub on_missing_key: MissingKeyPolicy,
}

impl GenerateParams {
    pub fn to_options(&self) -> WriteOptions {
        WriteOptions::new(
            self.sheet_name
                .clone()
                .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string()),
        )
        .with_missing_key_policy(self.on_missing_key)
    }
}

/// POST /api/v1/generate - JSON array of objects → .xlsx bytes
///
/// The body is taken as raw text so a bad document surfaces as
/// `MalformedInput` rather than an extractor rejection.
pub async fn generate(Query(params): Query<GenerateParams>, body: String) -> Response {
    let options = params.to_options();

    let result =
        tokio::task::spawn_blocking(move || ExcelExporter::new(options).export_json(&body)).await;

    match result {
        Ok(Ok(bytes)) => (
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"records.xlsx\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Ok(Err(e)) => error_response(status_for(&e), e.to_string()),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("generate task failed: {}", e),
        ),
    }
}
