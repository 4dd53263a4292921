// ==============================================================================
// state.rs - Application State Management
// ==============================================================================
// Description: Shared application state for API gateway
// Author: Matt Barham
// Created: 2026-08-23
// Modified: 2026-08-23
// Version: 1.0.0
// ==============================================================================

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::validator::{FileValidator, DEFAULT_MAX_TABLE_FILE_SIZE};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Upload validator, configured once at startup
    pub validator: FileValidator,
}

impl AppState {
    /// Create new application state from environment
    pub fn new() -> Result<Self> {
        // Per-file upload size limit (bytes)
        let max_table_file_size = std::env::var("MAX_TABLE_FILE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_TABLE_FILE_SIZE);

        info!(
            "Upload limit: {} bytes per table file",
            max_table_file_size
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                validator: FileValidator::with_max_size(max_table_file_size),
            }),
        })
    }

    /// Get the upload validator
    pub fn validator(&self) -> &FileValidator {
        &self.inner.validator
    }

    /// Create mock state for testing
    #[cfg(test)]
    pub fn mock() -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                validator: FileValidator::new(),
            }),
        }
    }
}
