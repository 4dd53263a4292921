// ==============================================================================
// parsers/mod.rs - File parser modules
// ==============================================================================
// Description: Parsers for delimited phenotype and genotype tables
// Author: Matt Barham
// Created: 2026-08-23
// Modified: 2026-08-23
// Version: 1.0.0
// ==============================================================================

pub mod table;

pub use table::{parse_allele_table, parse_phenotype_table, TableParseError};
