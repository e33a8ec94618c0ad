//! The report contract handed to report renderers: every comparison, the
//! sources consulted and per-status counts.

use chrono::{DateTime, Utc};
use listcheck_core::{ComparisonResult, ExtractionResult, FieldStatus, VariantStatus};
use serde::{Deserialize, Serialize};

/// A record with at least one non-match field or a non-match variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub row: usize,
    pub label: String,
    /// Fields whose status is not `match`, in field-name order.
    pub fields: Vec<String>,
    pub variant: VariantStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub records: usize,
    pub fields_match: usize,
    pub fields_mismatch: usize,
    pub fields_missing: usize,
    pub variants_match: usize,
    pub variants_partial: usize,
    pub variants_missing: usize,
    pub discrepancies: Vec<Discrepancy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub generated_at: DateTime<Utc>,
    pub sources: Vec<String>,
    pub summary: ReportSummary,
    pub results: Vec<ComparisonResult>,
}

/// Distinct source keys across `results`, sorted.
#[must_use]
pub fn sources_consulted(results: &[ExtractionResult]) -> Vec<String> {
    let mut sources: Vec<String> = results.iter().map(|r| r.source.clone()).collect();
    sources.sort();
    sources.dedup();
    sources
}

#[must_use]
pub fn build_report(results: Vec<ComparisonResult>, sources: Vec<String>) -> VerificationReport {
    let mut summary = ReportSummary {
        records: results.len(),
        ..ReportSummary::default()
    };

    for result in &results {
        for field in result.fields.values() {
            match field.status {
                FieldStatus::Match => summary.fields_match += 1,
                FieldStatus::Mismatch => summary.fields_mismatch += 1,
                FieldStatus::Missing => summary.fields_missing += 1,
            }
        }
        match result.variant.status {
            VariantStatus::Match => summary.variants_match += 1,
            VariantStatus::Partial => summary.variants_partial += 1,
            VariantStatus::Missing => summary.variants_missing += 1,
        }
        if result.has_discrepancy() {
            summary.discrepancies.push(Discrepancy {
                row: result.row,
                label: result.label.clone(),
                fields: result
                    .fields
                    .iter()
                    .filter(|(_, f)| f.status != FieldStatus::Match)
                    .map(|(name, _)| name.clone())
                    .collect(),
                variant: result.variant.status,
            });
        }
    }

    tracing::info!(
        records = summary.records,
        discrepancies = summary.discrepancies.len(),
        "verification report built"
    );

    VerificationReport {
        generated_at: Utc::now(),
        sources,
        summary,
        results,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use listcheck_core::{FieldComparison, StrategyTag, VariantCheck};

    use super::*;

    fn field(status: FieldStatus) -> FieldComparison {
        FieldComparison {
            authoritative: "x".to_string(),
            scraped: BTreeMap::new(),
            status,
            note: None,
        }
    }

    fn result(row: usize, fields: &[(&str, FieldStatus)], variant: VariantStatus) -> ComparisonResult {
        ComparisonResult {
            row,
            label: format!("Record {row}"),
            fields: fields
                .iter()
                .map(|(name, status)| ((*name).to_string(), field(*status)))
                .collect(),
            variant: VariantCheck {
                authoritative: "Standard".to_string(),
                found_on: Vec::new(),
                not_found_on: Vec::new(),
                status: variant,
            },
        }
    }

    #[test]
    fn counts_statuses_and_lists_only_discrepant_records() {
        let results = vec![
            result(
                2,
                &[("price", FieldStatus::Match), ("range", FieldStatus::Match)],
                VariantStatus::Match,
            ),
            result(
                3,
                &[("price", FieldStatus::Mismatch), ("range", FieldStatus::Missing)],
                VariantStatus::Match,
            ),
            result(4, &[("price", FieldStatus::Match)], VariantStatus::Partial),
        ];

        let report = build_report(results, vec!["site_a".to_string()]);
        let summary = &report.summary;

        assert_eq!(summary.records, 3);
        assert_eq!(summary.fields_match, 3);
        assert_eq!(summary.fields_mismatch, 1);
        assert_eq!(summary.fields_missing, 1);
        assert_eq!(summary.variants_match, 2);
        assert_eq!(summary.variants_partial, 1);
        assert_eq!(
            summary.discrepancies,
            vec![
                Discrepancy {
                    row: 3,
                    label: "Record 3".to_string(),
                    fields: vec!["price".to_string(), "range".to_string()],
                    variant: VariantStatus::Match,
                },
                Discrepancy {
                    row: 4,
                    label: "Record 4".to_string(),
                    fields: Vec::new(),
                    variant: VariantStatus::Partial,
                },
            ]
        );
    }

    #[test]
    fn sources_are_distinct_and_sorted() {
        let results = vec![
            ExtractionResult::empty("site_b", "https://b.example", StrategyTag::None, Vec::new()),
            ExtractionResult::empty("site_a", "https://a.example", StrategyTag::None, Vec::new()),
            ExtractionResult::empty("site_b", "https://b.example/2", StrategyTag::None, Vec::new()),
        ];
        assert_eq!(sources_consulted(&results), vec!["site_a", "site_b"]);
    }

    #[test]
    fn report_serializes_statuses_lowercase() {
        let report = build_report(
            vec![result(2, &[("price", FieldStatus::Missing)], VariantStatus::Missing)],
            Vec::new(),
        );
        let json = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(json["results"][0]["fields"]["price"]["status"], "missing");
        assert_eq!(json["summary"]["discrepancies"][0]["variant"], "missing");
    }
}
