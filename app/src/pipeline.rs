// ==============================================================================
// pipeline.rs - Batch Processing Pipeline
// ==============================================================================
// Description: Drives parse -> merge -> classify -> partition per genotype file
// Author: Matt Barham
// Created: 2026-08-23
// Modified: 2026-08-23
// Version: 1.0.0
// ==============================================================================

use thiserror::Error;
use tracing::{debug, info};

use crate::engine::{merge_and_classify, partition};
use crate::models::{FileResult, TableFile};
use crate::parsers::{parse_allele_table, parse_phenotype_table, TableParseError};

/// Phenotype tables are tab-delimited
pub const PHENOTYPE_DELIMITER: u8 = b'\t';

/// Genotype tables are comma-delimited
pub const GENOTYPE_DELIMITER: u8 = b',';

/// Errors that can occur while processing an upload batch
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to parse '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: TableParseError,
    },
}

/// Process one phenotype table against a batch of genotype files
///
/// The phenotype table is parsed once and shared read-only across the batch.
/// Genotype files are processed sequentially in input order, so the output
/// order mirrors the input order (downstream plot containers are keyed by
/// file name). All-or-nothing: the first parse failure aborts the batch and
/// no results are returned.
pub fn process_batch(
    pheno: &TableFile,
    genotype_files: &[TableFile],
) -> Result<Vec<FileResult>, PipelineError> {
    info!(
        "Processing batch: phenotype table '{}' against {} genotype file(s)",
        pheno.name,
        genotype_files.len()
    );

    let phenotype_rows =
        parse_phenotype_table(&pheno.data, PHENOTYPE_DELIMITER).map_err(|source| {
            PipelineError::Parse {
                name: pheno.name.clone(),
                source,
            }
        })?;
    debug!("Parsed {} phenotype row(s)", phenotype_rows.len());

    let mut results = Vec::with_capacity(genotype_files.len());
    for file in genotype_files {
        let allele_rows =
            parse_allele_table(&file.data, GENOTYPE_DELIMITER).map_err(|source| {
                PipelineError::Parse {
                    name: file.name.clone(),
                    source,
                }
            })?;

        let classified = merge_and_classify(&phenotype_rows, &allele_rows);
        let (major_data, minor_data) = partition(classified);

        info!(
            "{}: {} allele row(s) -> {} major / {} minor",
            file.name,
            allele_rows.len(),
            major_data.len(),
            minor_data.len()
        );

        results.push(FileResult {
            file_name: file.name.clone(),
            major_data,
            minor_data,
        });
    }

    Ok(results)
}
