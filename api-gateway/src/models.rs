// ==============================================================================
// models.rs - API Data Models
// ==============================================================================
// Description: Request/response models for the SNP classification API
// Author: Matt Barham
// Created: 2026-08-23
// Modified: 2026-08-23
// Version: 1.0.0
// ==============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;

use snp_pheno_processor::models::FileResult;

/// Successful upload response: per-file major/minor partitions for plotting
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub data: Vec<FileResult>,
}

/// API information response
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}
