// ==============================================================================
// handlers.rs - API Request Handlers
// ==============================================================================
// Description: HTTP request handlers for the SNP classification API
// Author: Matt Barham
// Created: 2026-08-23
// Modified: 2026-08-23
// Version: 1.0.0
// ==============================================================================

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{error, info, warn};

use snp_pheno_processor::models::TableFile;
use snp_pheno_processor::pipeline::process_batch;

use crate::{
    models::*,
    state::AppState,
    validator::TableKind,
};

const MISSING_FILES_MESSAGE: &str = "Please upload all required files";
const PROCESSING_FAILED_MESSAGE: &str = "An error occurred during file processing";

/// Root endpoint - API information
pub async fn root() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: "SNP/Phenotype API Gateway",
        version: "1.0.0",
        endpoints: vec![
            "/health - Health check",
            "/upload - Classify SNP alleles against a phenotype table (POST, multipart)",
        ],
    })
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: "1.0.0",
        timestamp: Utc::now(),
    })
}

/// Table upload endpoint
///
/// Expects a multipart form with one `pheno_file` field (TSV) and one or
/// more `snp_files` fields (CSV). Everything is held in memory for the
/// duration of the request; nothing is written to disk or persisted.
pub async fn upload_tables(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    info!("Received table upload request");

    let mut pheno_file: Option<TableFile> = None;
    let mut snp_files: Vec<TableFile> = Vec::new();

    // Process multipart form fields
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "pheno_file" => {
                let filename = field.file_name().unwrap_or("phenotype.tsv").to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read phenotype file: {}", e))
                })?;

                let validated = state
                    .validator()
                    .validate_upload(&filename, &data, TableKind::Phenotype)
                    .map_err(|e| {
                        AppError::BadRequest(format!("Invalid phenotype file: {}", e))
                    })?;

                info!(
                    "Phenotype file validated: {} ({} bytes, SHA256: {})",
                    validated.safe_name,
                    validated.size,
                    &validated.hash_sha256[..16]
                );

                pheno_file = Some(TableFile::new(validated.safe_name, data.to_vec()));
            }

            "snp_files" => {
                let filename = field.file_name().unwrap_or("snp.csv").to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read SNP file: {}", e))
                })?;

                let validated = state
                    .validator()
                    .validate_upload(&filename, &data, TableKind::Genotype)
                    .map_err(|e| AppError::BadRequest(format!("Invalid SNP file: {}", e)))?;

                info!(
                    "SNP file validated: {} ({} bytes, SHA256: {})",
                    validated.safe_name,
                    validated.size,
                    &validated.hash_sha256[..16]
                );

                snp_files.push(TableFile::new(validated.safe_name, data.to_vec()));
            }

            _ => {
                warn!("Unknown multipart field: {}", name);
            }
        }
    }

    // Validate required files
    let pheno_file =
        pheno_file.ok_or_else(|| AppError::BadRequest(MISSING_FILES_MESSAGE.to_string()))?;

    if snp_files.is_empty() {
        return Err(AppError::BadRequest(MISSING_FILES_MESSAGE.to_string()));
    }

    // Run the shared merge/classify pipeline. All-or-nothing: one bad file
    // fails the whole request, details stay in the server log.
    let data = process_batch(&pheno_file, &snp_files)
        .map_err(|e| AppError::Internal(format!("Batch processing failed: {}", e)))?;

    info!(
        "Upload processed: {} genotype file(s) classified",
        data.len()
    );

    Ok(Json(UploadResponse {
        success: true,
        data,
    }))
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Plain-text error bodies; internal details are logged, not returned
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    PROCESSING_FAILED_MESSAGE.to_string(),
                )
            }
        };

        (status, error_message).into_response()
    }
}
