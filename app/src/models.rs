// ==============================================================================
// models.rs - SNP/Phenotype Data Models
// ==============================================================================
// Description: Row and result types for allele merge/classify processing
// Author: Matt Barham
// Created: 2026-08-23
// Modified: 2026-08-23
// Version: 1.0.0
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column holding the sample identifier in phenotype tables
pub const PHENOTYPE_KEY_COLUMN: &str = "Accession_ID";

/// Column holding the sample identifier in genotype tables
pub const ALLELE_KEY_COLUMN: &str = "strain";

/// Column holding the observed allele value in genotype tables
pub const ALLELE_VALUE_COLUMN: &str = "alt";

/// One row of the phenotype table
///
/// Carries the sample identifier plus every other phenotype column as-is.
/// An empty `accession_id` is legal; it simply never matches an allele row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhenotypeRow {
    /// Sample identifier (join key)
    #[serde(rename = "Accession_ID")]
    pub accession_id: String,

    /// All remaining phenotype columns, passed through untouched
    #[serde(flatten)]
    pub traits: BTreeMap<String, String>,
}

/// One row of a genotype (SNP allele) table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlleleRow {
    /// Sample identifier as named in genotype files
    pub strain: String,

    /// Observed allele value (may be empty)
    pub alt: String,

    /// All remaining genotype columns, passed through untouched
    #[serde(flatten)]
    pub extras: BTreeMap<String, String>,
}

/// An [`AlleleRow`] after the rekey stage
///
/// `accession_id` is a copy of `strain`; the original field stays present so
/// the rekey is a pure projection, not a rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedAlleleRow {
    /// Join key copied from `strain`
    #[serde(rename = "Accession_ID")]
    pub accession_id: String,

    /// Original sample identifier, retained
    pub strain: String,

    /// Observed allele value (may be empty)
    pub alt: String,

    #[serde(flatten)]
    pub extras: BTreeMap<String, String>,
}

/// Classification label for a joined row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlleleClass {
    Major,
    Minor,
}

impl AlleleClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlleleClass::Major => "major",
            AlleleClass::Minor => "minor",
        }
    }
}

/// A phenotype row joined with its allele value and classified
///
/// `alt` is `None` when the left join found no matching allele row; such
/// rows are always classified [`AlleleClass::Major`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRow {
    /// Sample identifier (join key)
    #[serde(rename = "Accession_ID")]
    pub accession_id: String,

    /// Allele value from the first matching allele row, if any
    pub alt: Option<String>,

    /// Major/minor classification
    pub allele: AlleleClass,

    /// Phenotype columns passed through from the input row
    #[serde(flatten)]
    pub traits: BTreeMap<String, String>,
}

/// Per-genotype-file result handed to the plotting/export stage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    /// Name of the genotype file this result was computed from
    pub file_name: String,

    /// Rows classified "major", in joined order
    pub major_data: Vec<ClassifiedRow>,

    /// Rows classified "minor", in joined order
    pub minor_data: Vec<ClassifiedRow>,
}

/// In-memory handle for an uploaded or locally read table file
#[derive(Debug, Clone)]
pub struct TableFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl TableFile {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traits(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_classified_row_json_shape() {
        let row = ClassifiedRow {
            accession_id: "S1".to_string(),
            alt: Some("A".to_string()),
            allele: AlleleClass::Minor,
            traits: traits(&[("trait", "5")]),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["Accession_ID"], "S1");
        assert_eq!(json["alt"], "A");
        assert_eq!(json["allele"], "minor");
        assert_eq!(json["trait"], "5");
    }

    #[test]
    fn test_unmatched_row_serializes_null_alt() {
        let row = ClassifiedRow {
            accession_id: "S3".to_string(),
            alt: None,
            allele: AlleleClass::Major,
            traits: BTreeMap::new(),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert!(json["alt"].is_null());
        assert_eq!(json["allele"], "major");
    }

    #[test]
    fn test_file_result_uses_camel_case_keys() {
        let result = FileResult {
            file_name: "chr1.csv".to_string(),
            major_data: vec![],
            minor_data: vec![],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["fileName"], "chr1.csv");
        assert!(json["majorData"].as_array().unwrap().is_empty());
        assert!(json["minorData"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_allele_class_str() {
        assert_eq!(AlleleClass::Major.as_str(), "major");
        assert_eq!(AlleleClass::Minor.as_str(), "minor");
    }
}
