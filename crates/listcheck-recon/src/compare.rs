//! Comparison of one authoritative record against per-source extraction
//! results. Comparison never fails: every field lands in one of the three
//! statuses.

use std::collections::BTreeMap;

use listcheck_core::{
    AuthoritativeRecord, ComparisonResult, ExtractionResult, FieldComparison, FieldStatus,
    VariantCheck, VariantStatus,
};
use rust_decimal::Decimal;

use crate::aliases::resolve_field;
use crate::normalize::{extract_numbers, values_match};

/// Field name under which the price comparison is reported.
pub const PRICE_FIELD: &str = "price";

/// Range-based price comparison: the first number in the authoritative price
/// must fall within the min/max of every number any source reported,
/// inclusive.
///
/// The result is `missing` when no source reported a price, and also when
/// no number can be parsed from either side.
#[must_use]
pub fn compare_price(authoritative: &str, scraped: &BTreeMap<String, String>) -> FieldComparison {
    let field = |status, note: Option<String>| FieldComparison {
        authoritative: authoritative.to_string(),
        scraped: scraped.clone(),
        status,
        note,
    };

    if scraped.is_empty() {
        return field(FieldStatus::Missing, None);
    }

    let target = extract_numbers(authoritative).into_iter().next();
    let scraped_numbers: Vec<Decimal> = scraped.values().flat_map(|v| extract_numbers(v)).collect();
    let range = scraped_numbers
        .iter()
        .min()
        .copied()
        .zip(scraped_numbers.iter().max().copied());

    match (target, range) {
        (Some(target), Some((min, max))) => {
            let range_note = if min == max {
                format!("scraped price {min}")
            } else {
                format!("scraped range {min} to {max}")
            };
            if (min..=max).contains(&target) {
                field(FieldStatus::Match, Some(range_note))
            } else {
                field(
                    FieldStatus::Mismatch,
                    Some(format!("{target} outside {range_note}")),
                )
            }
        }
        (None, _) => field(
            FieldStatus::Missing,
            Some("authoritative price has no number".to_string()),
        ),
        (Some(_), None) => field(
            FieldStatus::Missing,
            Some("no number in any scraped price".to_string()),
        ),
    }
}

/// Compare a non-price field. `match` only when every source that reported
/// the field agrees; `missing` when none reported it; `mismatch` otherwise.
#[must_use]
pub fn compare_field(authoritative: &str, scraped: &BTreeMap<String, String>) -> FieldComparison {
    let (agreeing, differing): (Vec<&str>, Vec<&str>) = {
        let (yes, no): (Vec<_>, Vec<_>) = scraped
            .iter()
            .partition(|(_, value)| values_match(authoritative, value));
        (
            yes.into_iter().map(|(source, _)| source.as_str()).collect(),
            no.into_iter().map(|(source, _)| source.as_str()).collect(),
        )
    };

    let (status, note) = if scraped.is_empty() {
        (FieldStatus::Missing, None)
    } else if differing.is_empty() {
        (FieldStatus::Match, None)
    } else if agreeing.is_empty() {
        (
            FieldStatus::Mismatch,
            Some(format!("differs on {}", differing.join(", "))),
        )
    } else {
        (
            FieldStatus::Mismatch,
            Some(format!(
                "agrees on {}; differs on {}",
                agreeing.join(", "),
                differing.join(", ")
            )),
        )
    };

    FieldComparison {
        authoritative: authoritative.to_string(),
        scraped: scraped.clone(),
        status,
        note,
    }
}

/// A variant is found on a source when any of its reported variant names
/// contains the authoritative variant, case-insensitively. Zero sources, or
/// a blank authoritative variant, yields `missing`.
#[must_use]
pub fn check_variant(authoritative: &str, per_source: &BTreeMap<String, Vec<String>>) -> VariantCheck {
    let needle = authoritative.trim().to_lowercase();
    if needle.is_empty() {
        return VariantCheck {
            authoritative: authoritative.to_string(),
            found_on: Vec::new(),
            not_found_on: Vec::new(),
            status: VariantStatus::Missing,
        };
    }

    let (found, not_found): (Vec<_>, Vec<_>) = per_source.iter().partition(|(_, variants)| {
        variants
            .iter()
            .any(|v| v.to_lowercase().contains(&needle))
    });
    let found_on: Vec<String> = found.into_iter().map(|(source, _)| source.clone()).collect();
    let not_found_on: Vec<String> = not_found
        .into_iter()
        .map(|(source, _)| source.clone())
        .collect();

    let status = if found_on.is_empty() {
        VariantStatus::Missing
    } else if not_found_on.is_empty() {
        VariantStatus::Match
    } else {
        VariantStatus::Partial
    };

    VariantCheck {
        authoritative: authoritative.to_string(),
        found_on,
        not_found_on,
        status,
    }
}

/// Keep only results that obtained data, one per source. A later result for
/// the same source replaces an earlier one.
#[must_use]
pub fn usable_results(results: &[ExtractionResult]) -> BTreeMap<&str, &ExtractionResult> {
    results
        .iter()
        .filter(|r| r.strategy.is_hit())
        .map(|r| (r.source.as_str(), r))
        .collect()
}

/// Compare one record against every source's extraction result.
#[must_use]
pub fn compare_record(record: &AuthoritativeRecord, results: &[ExtractionResult]) -> ComparisonResult {
    let by_source = usable_results(results);
    tracing::debug!(
        row = record.row,
        sources = by_source.len(),
        "comparing record"
    );

    let mut fields = BTreeMap::new();

    if !record.price.trim().is_empty() {
        let scraped: BTreeMap<String, String> = by_source
            .iter()
            .filter_map(|(source, result)| {
                let price = result.data.price.as_deref()?.trim();
                (!price.is_empty()).then(|| ((*source).to_string(), price.to_string()))
            })
            .collect();
        fields.insert(PRICE_FIELD.to_string(), compare_price(&record.price, &scraped));
    }

    for (name, value) in &record.specs {
        let scraped: BTreeMap<String, String> = by_source
            .iter()
            .filter_map(|(source, result)| {
                let (_, found) = resolve_field(name, &result.data.specs)?;
                Some(((*source).to_string(), found.to_string()))
            })
            .collect();
        fields.insert(name.clone(), compare_field(value, &scraped));
    }

    let variants: BTreeMap<String, Vec<String>> = by_source
        .iter()
        .map(|(source, result)| ((*source).to_string(), result.data.variants.clone()))
        .collect();

    ComparisonResult {
        row: record.row,
        label: record.label(),
        fields,
        variant: check_variant(&record.variant, &variants),
    }
}

#[cfg(test)]
#[path = "compare_test.rs"]
mod tests;
