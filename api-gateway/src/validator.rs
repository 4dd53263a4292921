// ==============================================================================
// validator.rs - File Upload Validation (API Gateway)
// ==============================================================================
// Description: Validates uploaded table files before they enter the pipeline
// Author: Matt Barham
// Created: 2026-08-23
// Modified: 2026-08-23
// Version: 1.0.0
// Security: Allowlist-only file types, plain-text content checks, size limits
// ==============================================================================

use anyhow::Result;
use axum::body::Bytes;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Default per-file upload size limit (25 MB)
pub const DEFAULT_MAX_TABLE_FILE_SIZE: usize = 25 * 1024 * 1024;

// Content sniffing only inspects the head of the file
const SNIFF_LEN: usize = 8 * 1024;

#[derive(Debug)]
pub struct ValidatedFile {
    pub original_name: String,
    pub safe_name: String,
    pub size: usize,
    pub hash_sha256: String,
    pub validated_at: chrono::DateTime<chrono::Utc>,
}

/// Kind of table being uploaded, selecting allowlist and delimiter checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Tab-delimited phenotype table (.tsv / .txt)
    Phenotype,
    /// Comma-delimited genotype table (.csv)
    Genotype,
}

impl TableKind {
    fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            TableKind::Phenotype => &["tsv", "txt"],
            TableKind::Genotype => &["csv"],
        }
    }

    fn delimiter(&self) -> u8 {
        match self {
            TableKind::Phenotype => b'\t',
            TableKind::Genotype => b',',
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TableKind::Phenotype => "phenotype",
            TableKind::Genotype => "genotype",
        }
    }
}

pub struct FileValidator {
    max_table_file_size: usize,
}

impl FileValidator {
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_TABLE_FILE_SIZE)
    }

    pub fn with_max_size(max_table_file_size: usize) -> Self {
        Self {
            max_table_file_size,
        }
    }

    /// Validate file upload from multipart form data
    pub fn validate_upload(
        &self,
        filename: &str,
        file_data: &Bytes,
        kind: TableKind,
    ) -> Result<ValidatedFile> {
        info!("Validating file: {} (kind: {})", filename, kind.label());

        // 1. Size check (BEFORE any processing)
        let size = file_data.len();
        if size > self.max_table_file_size {
            anyhow::bail!(
                "File too large: {} bytes (max: {} bytes)",
                size,
                self.max_table_file_size
            );
        }
        if size == 0 {
            anyhow::bail!("File is empty");
        }
        debug!("Size check passed: {} bytes", size);

        // 2. Filename sanitization
        let safe_name = self.sanitize_filename(filename)?;
        debug!("Sanitized filename: {}", safe_name);

        // 3. Extension check (allowlist)
        let ext = self.get_extension(&safe_name)?;
        if !kind.allowed_extensions().contains(&ext.as_str()) {
            anyhow::bail!("Invalid file type for {} table: .{}", kind.label(), ext);
        }
        debug!("Extension check passed: .{}", ext);

        // 4. Content validation (plain text with the expected delimiter)
        self.validate_content(file_data, kind)?;
        debug!("Content validation passed");

        // 5. Compute SHA-256 hash
        let hash = self.compute_sha256(file_data);
        debug!("SHA-256: {}", hash);

        Ok(ValidatedFile {
            original_name: filename.to_string(),
            safe_name,
            size,
            hash_sha256: hash,
            validated_at: chrono::Utc::now(),
        })
    }

    fn sanitize_filename(&self, name: &str) -> Result<String> {
        // Remove path separators, null bytes, control characters
        let safe = name
            .replace(['/', '\\', '\0'], "_")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.' || *c == '-')
            .collect::<String>();

        // Limit length to 255 characters
        let truncated: String = safe.chars().take(255).collect();

        // Must not be empty after sanitization
        if truncated.is_empty() {
            anyhow::bail!("Invalid filename after sanitization");
        }

        // Must not start with . (hidden file)
        if truncated.starts_with('.') {
            anyhow::bail!("Filename cannot start with '.'");
        }

        Ok(truncated)
    }

    fn get_extension(&self, filename: &str) -> Result<String> {
        let ext = filename
            .rsplit('.')
            .next()
            .map(|s| s.to_lowercase())
            .ok_or_else(|| anyhow::anyhow!("No file extension found"))?;

        if ext == filename.to_lowercase() {
            anyhow::bail!("No file extension found");
        }

        Ok(ext)
    }

    fn validate_content(&self, data: &Bytes, kind: TableKind) -> Result<()> {
        let head = &data[..data.len().min(SNIFF_LEN)];

        // Tables are plain text; a NUL byte means a binary upload
        if head.contains(&0u8) {
            anyhow::bail!("File does not look like a plain-text table");
        }

        // Header row must contain the expected delimiter (a one-column table
        // can never satisfy the required-columns contract downstream)
        let header_line = head.split(|&b| b == b'\n').next().unwrap_or(head);
        if !header_line.contains(&kind.delimiter()) {
            anyhow::bail!(
                "{} table header does not contain the expected delimiter",
                kind.label()
            );
        }

        Ok(())
    }

    fn compute_sha256(&self, data: &Bytes) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        let validator = FileValidator::new();

        assert_eq!(
            validator.sanitize_filename("phenotype_data.tsv").unwrap(),
            "phenotype_data.tsv"
        );

        assert_eq!(
            validator.sanitize_filename("dir/snp data!.csv").unwrap(),
            "dir_snpdata.csv"
        );

        assert!(validator.sanitize_filename(".hidden").is_err());
        assert!(validator.sanitize_filename("!!!").is_err());
    }

    #[test]
    fn test_get_extension() {
        let validator = FileValidator::new();

        assert_eq!(validator.get_extension("snp1.csv").unwrap(), "csv");
        assert_eq!(validator.get_extension("pheno.TSV").unwrap(), "tsv");
        assert!(validator.get_extension("noextension").is_err());
    }

    #[test]
    fn test_extension_allowlist_per_kind() {
        let validator = FileValidator::new();

        let tsv = Bytes::from_static(b"Accession_ID\ttrait\nS1\t5\n");
        assert!(validator
            .validate_upload("pheno.tsv", &tsv, TableKind::Phenotype)
            .is_ok());
        assert!(validator
            .validate_upload("pheno.csv", &tsv, TableKind::Phenotype)
            .is_err());

        let csv = Bytes::from_static(b"strain,alt\nS1,A\n");
        assert!(validator
            .validate_upload("snp.csv", &csv, TableKind::Genotype)
            .is_ok());
        assert!(validator
            .validate_upload("snp.tsv", &csv, TableKind::Genotype)
            .is_err());
    }

    #[test]
    fn test_binary_content_rejected() {
        let validator = FileValidator::new();

        let data = Bytes::from_static(b"strain,alt\nS1,\x00A\n");
        let result = validator.validate_upload("snp.csv", &data, TableKind::Genotype);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_delimiter_rejected() {
        let validator = FileValidator::new();

        // Comma-delimited content in a phenotype (tab-delimited) slot
        let data = Bytes::from_static(b"Accession_ID,trait\nS1,5\n");
        let result = validator.validate_upload("pheno.tsv", &data, TableKind::Phenotype);
        assert!(result.is_err());
    }

    #[test]
    fn test_size_limits() {
        let validator = FileValidator::with_max_size(16);

        let data = Bytes::from_static(b"strain,alt\nS1,A\nS2,G\n");
        let result = validator.validate_upload("snp.csv", &data, TableKind::Genotype);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too large"));

        let empty = Bytes::new();
        assert!(validator
            .validate_upload("snp.csv", &empty, TableKind::Genotype)
            .is_err());
    }

    #[test]
    fn test_validated_file_reports_hash() {
        let validator = FileValidator::new();

        let data = Bytes::from_static(b"strain,alt\nS1,A\n");
        let validated = validator
            .validate_upload("snp.csv", &data, TableKind::Genotype)
            .unwrap();

        assert_eq!(validated.size, data.len());
        assert_eq!(validated.hash_sha256.len(), 64);
        assert_eq!(validated.original_name, "snp.csv");
    }
}
