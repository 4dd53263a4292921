// ==============================================================================
// table.rs - Delimited Table Parser
// ==============================================================================
// Description: Parser for phenotype (TSV) and genotype (CSV) tables
// Author: Matt Barham
// Created: 2026-08-23
// Modified: 2026-08-23
// Version: 1.0.0
// ==============================================================================
// Format: Delimited text with a header row
// Phenotype example (tab-delimited):
//   Accession_ID    trait
//   S1    5
//   S2    7
// Genotype example (comma-delimited):
//   strain,alt
//   S1,A
//   S2,G
// ==============================================================================

use csv::ReaderBuilder;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{
    AlleleRow, PhenotypeRow, ALLELE_KEY_COLUMN, ALLELE_VALUE_COLUMN, PHENOTYPE_KEY_COLUMN,
};

/// Errors that can occur while parsing a delimited table
#[derive(Error, Debug)]
pub enum TableParseError {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{table} table is missing required column '{column}'")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error("table has no header row")]
    EmptyTable,
}

/// Parse a phenotype table
///
/// The first row is the header; it must contain an `Accession_ID` column.
/// Every other column is carried through untouched. Row order is preserved
/// and blank lines are skipped. Empty `Accession_ID` values are legal.
pub fn parse_phenotype_table(
    data: &[u8],
    delimiter: u8,
) -> Result<Vec<PhenotypeRow>, TableParseError> {
    let (headers, records) = read_table(data, delimiter)?;

    let key_idx = headers
        .iter()
        .position(|h| h == PHENOTYPE_KEY_COLUMN)
        .ok_or(TableParseError::MissingColumn {
            table: "phenotype",
            column: PHENOTYPE_KEY_COLUMN,
        })?;

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let mut accession_id = String::new();
        let mut traits = BTreeMap::new();

        for (idx, header) in headers.iter().enumerate() {
            let value = record.get(idx).unwrap_or("").to_string();
            if idx == key_idx {
                accession_id = value;
            } else {
                traits.insert(header.to_string(), value);
            }
        }

        rows.push(PhenotypeRow {
            accession_id,
            traits,
        });
    }

    Ok(rows)
}

/// Parse a genotype (SNP allele) table
///
/// The header must contain `strain` and `alt` columns; missing *values* in
/// data rows are legal (empty string), missing *columns* are a parse error.
pub fn parse_allele_table(data: &[u8], delimiter: u8) -> Result<Vec<AlleleRow>, TableParseError> {
    let (headers, records) = read_table(data, delimiter)?;

    let strain_idx = headers
        .iter()
        .position(|h| h == ALLELE_KEY_COLUMN)
        .ok_or(TableParseError::MissingColumn {
            table: "genotype",
            column: ALLELE_KEY_COLUMN,
        })?;
    let alt_idx = headers
        .iter()
        .position(|h| h == ALLELE_VALUE_COLUMN)
        .ok_or(TableParseError::MissingColumn {
            table: "genotype",
            column: ALLELE_VALUE_COLUMN,
        })?;

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let mut strain = String::new();
        let mut alt = String::new();
        let mut extras = BTreeMap::new();

        for (idx, header) in headers.iter().enumerate() {
            let value = record.get(idx).unwrap_or("").to_string();
            if idx == strain_idx {
                strain = value;
            } else if idx == alt_idx {
                alt = value;
            } else {
                extras.insert(header.to_string(), value);
            }
        }

        rows.push(AlleleRow {
            strain,
            alt,
            extras,
        });
    }

    Ok(rows)
}

/// Read headers and data records from delimited text
///
/// Rows with fewer fields than the header are tolerated (missing cells read
/// as empty); blank rows and rows whose cells are all empty are dropped.
fn read_table(
    data: &[u8],
    delimiter: u8,
) -> Result<(Vec<String>, Vec<csv::StringRecord>), TableParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(TableParseError::EmptyTable);
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        records.push(record);
    }

    Ok((headers, records))
}
