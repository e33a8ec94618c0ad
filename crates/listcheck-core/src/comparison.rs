//! Output shapes of the reconciliation engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStatus {
    Match,
    Mismatch,
    Missing,
}

impl std::fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldStatus::Match => write!(f, "match"),
            FieldStatus::Mismatch => write!(f, "mismatch"),
            FieldStatus::Missing => write!(f, "missing"),
        }
    }
}

/// One authoritative field compared against every source that reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldComparison {
    pub authoritative: String,
    /// Source key to the value that source reported; one entry per source.
    pub scraped: BTreeMap<String, String>,
    pub status: FieldStatus,
    pub note: Option<String>,
}

impl FieldComparison {
    /// `source: value` pairs joined with `; `, in source-key order.
    #[must_use]
    pub fn scraped_summary(&self) -> String {
        self.scraped
            .iter()
            .map(|(source, value)| format!("{source}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantStatus {
    Match,
    Partial,
    Missing,
}

impl std::fmt::Display for VariantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariantStatus::Match => write!(f, "match"),
            VariantStatus::Partial => write!(f, "partial"),
            VariantStatus::Missing => write!(f, "missing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantCheck {
    pub authoritative: String,
    pub found_on: Vec<String>,
    pub not_found_on: Vec<String>,
    pub status: VariantStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub row: usize,
    pub label: String,
    pub fields: BTreeMap<String, FieldComparison>,
    pub variant: VariantCheck,
}

impl ComparisonResult {
    /// `true` if any field is not a match or the variant was not found
    /// everywhere.
    #[must_use]
    pub fn has_discrepancy(&self) -> bool {
        self.variant.status != VariantStatus::Match
            || self
                .fields
                .values()
                .any(|field| field.status != FieldStatus::Match)
    }
}
