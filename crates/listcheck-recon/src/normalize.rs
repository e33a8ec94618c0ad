//! Value normalization: turns raw scraped or authoritative text into forms
//! that can be compared for equality.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

/// Unit and currency tokens removed during normalization. A token is removed
/// only when it does not touch another letter, so it may directly follow a
/// number (`75kwh`) but never eats part of a word (`Tesla`, `Model S`).
/// Longer spellings come first so the alternation prefers them.
static UNIT_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(^|[^a-z])(?:km/h|kmh|kph|mph|kwh|kw|km|miles|mile|bhp|hp|ps|nm|lb-ft|aed|usd|eur|gbp|sar|dhs|dirhams|dirham|seconds|secs|sec|kg|mm|cc|litres|litre|liters|liter)\b",
    )
    .expect("valid unit token regex")
});

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("valid number regex"));

const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];

/// Synonym sets for categorical values. Keys are matched after lowercasing
/// and turning `-`, `_` and `/` into spaces.
const SYNONYMS: &[(&str, &[&str])] = &[
    (
        "electric",
        &[
            "electric",
            "bev",
            "ev",
            "battery electric",
            "battery electric vehicle",
            "full electric",
            "fully electric",
            "electric vehicle",
            "all electric",
        ],
    ),
    (
        "hybrid",
        &["hybrid", "hev", "full hybrid", "self charging hybrid"],
    ),
    (
        "phev",
        &[
            "phev",
            "plug in hybrid",
            "plug in hybrid electric",
            "plug in hybrid electric vehicle",
        ],
    ),
    ("petrol", &["petrol", "gasoline", "gas", "unleaded"]),
    ("diesel", &["diesel", "turbo diesel"]),
    ("rwd", &["rwd", "rear wheel drive", "rear drive"]),
    ("fwd", &["fwd", "front wheel drive", "front drive"]),
    ("awd", &["awd", "all wheel drive"]),
    ("4wd", &["4wd", "4x4", "four wheel drive"]),
    (
        "automatic",
        &["automatic", "auto", "at", "automatic transmission"],
    ),
    ("manual", &["manual", "mt", "manual transmission"]),
];

/// Lowercase, drop unit/currency tokens, then remove whitespace and
/// thousands-separator commas.
///
/// `"AED 189,900"` and `"189900"` both normalize to `"189900"`.
#[must_use]
pub fn normalize_value(raw: &str) -> String {
    let lower = raw.to_lowercase();
    UNIT_TOKEN_RE
        .replace_all(&lower, "${1}")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && !CURRENCY_SYMBOLS.contains(c))
        .collect()
}

/// Canonical label for a categorical value, if it belongs to a known
/// synonym set.
#[must_use]
pub fn canonicalize(raw: &str) -> Option<&'static str> {
    let key = raw
        .to_lowercase()
        .replace(['-', '_', '/'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    SYNONYMS
        .iter()
        .find(|(_, synonyms)| synonyms.contains(&key.as_str()))
        .map(|(canonical, _)| *canonical)
}

/// Two values match when their normalized forms are equal or both belong to
/// the same synonym set.
#[must_use]
pub fn values_match(a: &str, b: &str) -> bool {
    if normalize_value(a) == normalize_value(b) {
        return true;
    }
    matches!((canonicalize(a), canonicalize(b)), (Some(x), Some(y)) if x == y)
}

/// Every numeric token in `raw`, in order, with thousands separators
/// removed.
///
/// `"AED 168,000 - 182,000"` yields `[168000, 182000]`.
#[must_use]
pub fn extract_numbers(raw: &str) -> Vec<Decimal> {
    NUMBER_RE
        .find_iter(raw)
        .filter_map(|m| Decimal::from_str(&m.as_str().replace(',', "")).ok())
        .map(|n| n.normalize())
        .collect()
}
