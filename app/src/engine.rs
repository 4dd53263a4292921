// ==============================================================================
// engine.rs - Merge-Classify Engine
// ==============================================================================
// Description: Joins phenotype rows with allele rows and labels major/minor
// Author: Matt Barham
// Created: 2026-08-23
// Modified: 2026-08-23
// Version: 1.0.0
// ==============================================================================

use std::collections::HashMap;
use tracing::debug;

use crate::models::{AlleleClass, AlleleRow, ClassifiedRow, KeyedAlleleRow, PhenotypeRow};

/// Copy `strain` into the `Accession_ID` slot, retaining every original field
///
/// Pure projection: the input row is untouched and duplicates are kept.
pub fn rekey(row: &AlleleRow) -> KeyedAlleleRow {
    KeyedAlleleRow {
        accession_id: row.strain.clone(),
        strain: row.strain.clone(),
        alt: row.alt.clone(),
        extras: row.extras.clone(),
    }
}

/// Join phenotype rows with allele rows and classify each as major or minor
///
/// Left-outer join from phenotype toward allele data: one output row per
/// phenotype row, in phenotype order. When several allele rows share an
/// `Accession_ID`, the first one in file order wins. A row is `minor` iff
/// its `alt` matched and equals the most common allele value; unmatched and
/// empty-alt rows are always `major`.
pub fn merge_and_classify(
    phenotype_rows: &[PhenotypeRow],
    allele_rows: &[AlleleRow],
) -> Vec<ClassifiedRow> {
    let keyed: Vec<KeyedAlleleRow> = allele_rows.iter().map(rekey).collect();

    // First occurrence wins for duplicate accession ids
    let mut by_accession: HashMap<&str, &KeyedAlleleRow> = HashMap::new();
    for row in &keyed {
        by_accession.entry(row.accession_id.as_str()).or_insert(row);
    }

    // Left join: alt from the first matching allele row, or None
    let joined_alts: Vec<Option<String>> = phenotype_rows
        .iter()
        .map(|pheno| {
            by_accession
                .get(pheno.accession_id.as_str())
                .map(|allele| allele.alt.clone())
        })
        .collect();

    // Only non-empty observed values count toward the mode
    let observed: Vec<&str> = joined_alts
        .iter()
        .filter_map(|alt| alt.as_deref())
        .filter(|alt| !alt.is_empty())
        .collect();

    let most_common = mode(&observed);
    debug!(
        "Mode over {} observed allele value(s): {:?}",
        observed.len(),
        most_common
    );

    phenotype_rows
        .iter()
        .zip(joined_alts)
        .map(|(pheno, alt)| {
            let is_minor = matches!(
                (alt.as_deref(), most_common.as_deref()),
                (Some(a), Some(m)) if a == m
            );
            ClassifiedRow {
                accession_id: pheno.accession_id.clone(),
                alt,
                allele: if is_minor {
                    AlleleClass::Minor
                } else {
                    AlleleClass::Major
                },
                traits: pheno.traits.clone(),
            }
        })
        .collect()
}

/// Most frequent value in `values`, or `None` when the slice is empty
///
/// Ties are broken in favor of the value whose final occurrence appears
/// latest in the input. This matches the behavior the plotting frontend was
/// built against (a stable ascending sort by frequency followed by taking
/// the last element), computed here with a single counting pass.
fn mode(values: &[&str]) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, &value) in values.iter().enumerate() {
        let entry = counts.entry(value).or_insert((0, 0));
        entry.0 += 1;
        entry.1 = idx;
    }

    // (count, last index) is unique per value, so the max is deterministic
    counts
        .into_iter()
        .max_by_key(|&(_, (count, last_idx))| (count, last_idx))
        .map(|(value, _)| value.to_string())
}

/// Split classified rows into (major, minor), preserving order per partition
pub fn partition(rows: Vec<ClassifiedRow>) -> (Vec<ClassifiedRow>, Vec<ClassifiedRow>) {
    rows.into_iter()
        .partition(|row| row.allele == AlleleClass::Major)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn pheno(accession_id: &str, trait_value: &str) -> PhenotypeRow {
        let mut traits = BTreeMap::new();
        traits.insert("trait".to_string(), trait_value.to_string());
        PhenotypeRow {
            accession_id: accession_id.to_string(),
            traits,
        }
    }

    fn allele(strain: &str, alt: &str) -> AlleleRow {
        AlleleRow {
            strain: strain.to_string(),
            alt: alt.to_string(),
            extras: BTreeMap::new(),
        }
    }

    #[test]
    fn test_rekey_retains_strain() {
        let row = allele("S1", "A");
        let keyed = rekey(&row);

        assert_eq!(keyed.accession_id, "S1");
        assert_eq!(keyed.strain, "S1");
        assert_eq!(keyed.alt, "A");
        // Input untouched
        assert_eq!(row.strain, "S1");
    }

    #[test]
    fn test_join_totality() {
        let phenos = vec![pheno("S1", "5"), pheno("S2", "7"), pheno("S3", "9")];
        let alleles = vec![allele("S1", "A")];

        let classified = merge_and_classify(&phenos, &alleles);
        assert_eq!(classified.len(), phenos.len());

        let ids: Vec<&str> = classified
            .iter()
            .map(|r| r.accession_id.as_str())
            .collect();
        assert_eq!(ids, vec!["S1", "S2", "S3"]);
    }

    #[test]
    fn test_unmatched_rows_are_major_with_null_alt() {
        let phenos = vec![pheno("S3", "9")];
        let alleles = vec![allele("S1", "A")];

        let classified = merge_and_classify(&phenos, &alleles);
        assert_eq!(classified[0].alt, None);
        assert_eq!(classified[0].allele, AlleleClass::Major);
    }

    #[test]
    fn test_duplicate_strain_first_row_wins() {
        let phenos = vec![pheno("S1", "5")];
        let alleles = vec![allele("S1", "A"), allele("S1", "G")];

        let classified = merge_and_classify(&phenos, &alleles);
        assert_eq!(classified[0].alt.as_deref(), Some("A"));
    }

    #[test]
    fn test_mode_tie_breaks_to_latest_occurrence() {
        // S1 -> "A", S2 -> "G" (duplicate S2 allele row is not double counted
        // by the join). Both values occur once; the tie goes to "G", the
        // value observed last.
        let phenos = vec![pheno("S1", "5"), pheno("S2", "7")];
        let alleles = vec![allele("S1", "A"), allele("S2", "G"), allele("S2", "G")];

        let classified = merge_and_classify(&phenos, &alleles);
        assert_eq!(classified[0].allele, AlleleClass::Major); // A != G
        assert_eq!(classified[1].allele, AlleleClass::Minor); // G == G
    }

    #[test]
    fn test_clear_majority_becomes_minor_label() {
        let phenos = vec![
            pheno("S1", "1"),
            pheno("S2", "2"),
            pheno("S3", "3"),
            pheno("S4", "4"),
        ];
        let alleles = vec![
            allele("S1", "A"),
            allele("S2", "A"),
            allele("S3", "A"),
            allele("S4", "G"),
        ];

        let classified = merge_and_classify(&phenos, &alleles);
        let labels: Vec<AlleleClass> = classified.iter().map(|r| r.allele).collect();
        assert_eq!(
            labels,
            vec![
                AlleleClass::Minor,
                AlleleClass::Minor,
                AlleleClass::Minor,
                AlleleClass::Major,
            ]
        );
    }

    #[test]
    fn test_empty_genotype_table_all_major() {
        let phenos = vec![pheno("S1", "5"), pheno("S2", "7")];

        let classified = merge_and_classify(&phenos, &[]);
        assert!(classified
            .iter()
            .all(|r| r.alt.is_none() && r.allele == AlleleClass::Major));
    }

    #[test]
    fn test_empty_alt_values_do_not_count_and_stay_major() {
        let phenos = vec![pheno("S1", "5"), pheno("S2", "7")];
        let alleles = vec![allele("S1", ""), allele("S2", "G")];

        let classified = merge_and_classify(&phenos, &alleles);
        assert_eq!(classified[0].alt.as_deref(), Some(""));
        assert_eq!(classified[0].allele, AlleleClass::Major);
        assert_eq!(classified[1].allele, AlleleClass::Minor);
    }

    #[test]
    fn test_all_empty_alts_have_no_mode() {
        let phenos = vec![pheno("S1", "5")];
        let alleles = vec![allele("S1", "")];

        let classified = merge_and_classify(&phenos, &alleles);
        assert_eq!(classified[0].allele, AlleleClass::Major);
    }

    #[test]
    fn test_determinism_across_invocations() {
        let phenos = vec![pheno("S1", "5"), pheno("S2", "7"), pheno("S3", "9")];
        let alleles = vec![allele("S1", "A"), allele("S2", "G"), allele("S3", "T")];

        let first = merge_and_classify(&phenos, &alleles);
        for _ in 0..10 {
            assert_eq!(merge_and_classify(&phenos, &alleles), first);
        }
    }

    #[test]
    fn test_mode_counts_and_tie_break() {
        assert_eq!(mode(&[]), None);
        assert_eq!(mode(&["A"]), Some("A".to_string()));
        assert_eq!(mode(&["A", "G", "G"]), Some("G".to_string()));
        assert_eq!(mode(&["G", "G", "A"]), Some("G".to_string()));
        // Tie: last occurrence wins
        assert_eq!(mode(&["A", "G"]), Some("G".to_string()));
        assert_eq!(mode(&["G", "A"]), Some("A".to_string()));
        assert_eq!(mode(&["A", "G", "A", "G"]), Some("G".to_string()));
    }

    #[test]
    fn test_partition_complete_disjoint_and_ordered() {
        let phenos = vec![
            pheno("S1", "1"),
            pheno("S2", "2"),
            pheno("S3", "3"),
            pheno("S4", "4"),
        ];
        let alleles = vec![
            allele("S1", "A"),
            allele("S2", "G"),
            allele("S3", "G"),
            allele("S4", "A"),
        ];

        let classified = merge_and_classify(&phenos, &alleles);
        let total = classified.len();
        let (major, minor) = partition(classified);

        assert_eq!(major.len() + minor.len(), total);
        assert!(major.iter().all(|r| r.allele == AlleleClass::Major));
        assert!(minor.iter().all(|r| r.allele == AlleleClass::Minor));

        // Order within each partition mirrors joined order
        let major_ids: Vec<&str> = major.iter().map(|r| r.accession_id.as_str()).collect();
        let minor_ids: Vec<&str> = minor.iter().map(|r| r.accession_id.as_str()).collect();
        assert_eq!(major_ids, vec!["S1", "S4"]);
        assert_eq!(minor_ids, vec!["S2", "S3"]);
    }

    #[test]
    fn test_inputs_not_mutated() {
        let phenos = vec![pheno("S1", "5")];
        let alleles = vec![allele("S1", "A")];
        let phenos_before = phenos.clone();
        let alleles_before = alleles.clone();

        let _ = merge_and_classify(&phenos, &alleles);
        assert_eq!(phenos, phenos_before);
        assert_eq!(alleles, alleles_before);
    }

    #[test]
    fn test_traits_pass_through() {
        let mut row = pheno("S1", "5");
        row.traits
            .insert("location".to_string(), "field-7".to_string());
        let alleles = vec![allele("S1", "A")];

        let classified = merge_and_classify(&[row], &alleles);
        assert_eq!(classified[0].traits["trait"], "5");
        assert_eq!(classified[0].traits["location"], "field-7");
    }
}
