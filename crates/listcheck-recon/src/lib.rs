//! Reconciliation of authoritative records against scraped listings.

pub mod aliases;
pub mod compare;
pub mod normalize;
pub mod report;

pub use aliases::{alias_group, alias_key, resolve_field};
pub use compare::{
    check_variant, compare_field, compare_price, compare_record, usable_results, PRICE_FIELD,
};
pub use normalize::{canonicalize, extract_numbers, normalize_value, values_match};
pub use report::{build_report, sources_consulted, Discrepancy, ReportSummary, VerificationReport};
