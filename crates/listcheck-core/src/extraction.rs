//! Extraction result types shared by the scraper and the reconciliation engine.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One extraction method in the waterfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Api,
    StaticHtml,
    HeadlessBrowser,
}

impl Strategy {
    /// Cheapest first.
    pub const DEFAULT_ORDER: [Strategy; 3] =
        [Strategy::Api, Strategy::StaticHtml, Strategy::HeadlessBrowser];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Api => "api",
            Strategy::StaticHtml => "static-html",
            Strategy::HeadlessBrowser => "headless-browser",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "api" => Ok(Strategy::Api),
            "static-html" => Ok(Strategy::StaticHtml),
            "headless-browser" => Ok(Strategy::HeadlessBrowser),
            other => Err(format!("unknown strategy '{other}'")),
        }
    }
}

/// Which strategy produced a result, or why none did.
///
/// Serialized as a plain string: `"api"`, `"static-html"`,
/// `"headless-browser"`, `"skipped: disabled"` or `"none"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum StrategyTag {
    Succeeded(Strategy),
    SkippedDisabled,
    None,
}

impl StrategyTag {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyTag::Succeeded(strategy) => strategy.as_str(),
            StrategyTag::SkippedDisabled => "skipped: disabled",
            StrategyTag::None => "none",
        }
    }

    #[must_use]
    pub fn is_hit(self) -> bool {
        matches!(self, StrategyTag::Succeeded(_))
    }
}

impl std::fmt::Display for StrategyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<StrategyTag> for String {
    fn from(tag: StrategyTag) -> Self {
        tag.as_str().to_string()
    }
}

impl TryFrom<String> for StrategyTag {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "skipped: disabled" => Ok(StrategyTag::SkippedDisabled),
            "none" => Ok(StrategyTag::None),
            other => other.parse().map(StrategyTag::Succeeded),
        }
    }
}

/// Structured payload pulled from a page or API response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedData {
    pub title: Option<String>,
    pub price: Option<String>,
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
    #[serde(default)]
    pub variants: Vec<String>,
}

impl ExtractedData {
    /// `true` when no structured field carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.as_deref().is_none_or(str::is_empty)
            && self.price.as_deref().is_none_or(str::is_empty)
            && self.specs.is_empty()
            && self.variants.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Hit,
    Miss { reason: String },
}

/// One step of the waterfall trail, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyAttempt {
    pub strategy: Strategy,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

/// The single, terminal result of one extraction call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub source: String,
    pub url: String,
    pub data: ExtractedData,
    /// Visible page text, whitespace-collapsed and length-bounded.
    pub raw_text: Option<String>,
    pub strategy: StrategyTag,
    #[serde(default)]
    pub attempts: Vec<StrategyAttempt>,
    pub extracted_at: DateTime<Utc>,
}

impl ExtractionResult {
    /// A result carrying no payload: disabled source or exhausted waterfall.
    #[must_use]
    pub fn empty(
        source: impl Into<String>,
        url: impl Into<String>,
        strategy: StrategyTag,
        attempts: Vec<StrategyAttempt>,
    ) -> Self {
        Self {
            source: source.into(),
            url: url.into(),
            data: ExtractedData::default(),
            raw_text: None,
            strategy,
            attempts,
            extracted_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_tag_serializes_as_plain_string() {
        let json = serde_json::to_string(&StrategyTag::SkippedDisabled).unwrap();
        assert_eq!(json, "\"skipped: disabled\"");
        let json = serde_json::to_string(&StrategyTag::Succeeded(Strategy::StaticHtml)).unwrap();
        assert_eq!(json, "\"static-html\"");
    }

    #[test]
    fn strategy_tag_parses_every_form() {
        for raw in ["api", "static-html", "headless-browser", "skipped: disabled", "none"] {
            let tag = StrategyTag::try_from(raw.to_string()).unwrap();
            assert_eq!(tag.as_str(), raw);
        }
        assert!(StrategyTag::try_from("selenium".to_string()).is_err());
    }

    #[test]
    fn extracted_data_with_blank_title_is_empty() {
        let data = ExtractedData {
            title: Some(String::new()),
            ..ExtractedData::default()
        };
        assert!(data.is_empty());
    }

    #[test]
    fn extracted_data_with_variants_is_not_empty() {
        let data = ExtractedData {
            variants: vec!["Long Range".to_string()],
            ..ExtractedData::default()
        };
        assert!(!data.is_empty());
    }

    #[test]
    fn attempt_serializes_flat() {
        let attempt = StrategyAttempt {
            strategy: Strategy::Api,
            outcome: AttemptOutcome::Miss {
                reason: "no API descriptor".to_string(),
            },
        };
        let value = serde_json::to_value(&attempt).unwrap();
        assert_eq!(value["strategy"], "api");
        assert_eq!(value["outcome"], "miss");
        assert_eq!(value["reason"], "no API descriptor");
    }
}
