//! Page extraction shared by the static-HTML and headless-browser
//! strategies, so both apply identical structured and raw-text rules.

use std::collections::BTreeMap;

use listcheck_core::{ExtractedData, SelectorDescriptor};
use scraper::{ElementRef, Html, Node, Selector};

use crate::outcome::PageCapture;

/// Upper bound on the raw fallback text, in characters.
pub(crate) const MAX_RAW_TEXT_CHARS: usize = 8_000;

/// Below this many characters of raw text, a page with no structured fields
/// carries too little signal to count as a hit.
pub(crate) const MIN_RAW_TEXT_CHARS: usize = 100;

/// Subtrees excluded from the raw text.
const STRIPPED_TAGS: [&str; 7] = [
    "script", "style", "nav", "header", "footer", "noscript", "iframe",
];

/// Parse `html` and pull structured fields (when selectors exist) plus the
/// bounded raw text.
pub(crate) fn extract_page(html: &str, selectors: Option<&SelectorDescriptor>) -> PageCapture {
    let document = Html::parse_document(html);
    let data = selectors
        .map(|s| extract_structured(&document, s))
        .unwrap_or_default();
    let raw_text = raw_text(&document);
    PageCapture {
        data,
        raw_text: (!raw_text.is_empty()).then_some(raw_text),
    }
}

/// A capture is usable when it has any structured field or enough text.
pub(crate) fn is_usable(capture: &PageCapture) -> bool {
    !capture.data.is_empty() || raw_text_chars(capture) >= MIN_RAW_TEXT_CHARS
}

pub(crate) fn raw_text_chars(capture: &PageCapture) -> usize {
    capture
        .raw_text
        .as_deref()
        .map_or(0, |text| text.chars().count())
}

fn parse_selector(raw: Option<&str>) -> Option<Selector> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match Selector::parse(raw) {
        Ok(selector) => Some(selector),
        Err(error) => {
            tracing::warn!(selector = raw, error = %error, "ignoring invalid CSS selector");
            None
        }
    }
}

fn extract_structured(document: &Html, selectors: &SelectorDescriptor) -> ExtractedData {
    let first_text = |raw: Option<&str>| {
        let selector = parse_selector(raw)?;
        document
            .select(&selector)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty())
    };

    let variants = parse_selector(selectors.variants.as_deref())
        .map(|selector| {
            document
                .select(&selector)
                .map(element_text)
                .filter(|text| !text.is_empty())
                .collect()
        })
        .unwrap_or_default();

    ExtractedData {
        title: first_text(selectors.title.as_deref()),
        price: first_text(selectors.price.as_deref()),
        specs: extract_specs(document, selectors),
        variants,
    }
}

/// Spec rows come in two layouts: label and value nested inside the row
/// (matched by the label/value sub-selectors), or the row itself being the
/// label with the value in its next sibling element (`dt` + `dd`). With both
/// sub-selectors configured only the nested layout applies, so a row missing
/// either part is skipped. The sibling layout never pairs a row with another
/// element of the same tag, which would be the next row.
fn extract_specs(document: &Html, selectors: &SelectorDescriptor) -> BTreeMap<String, String> {
    let mut specs = BTreeMap::new();
    let Some(row_selector) = parse_selector(selectors.spec_row.as_deref()) else {
        return specs;
    };
    let label_selector = parse_selector(selectors.spec_label.as_deref());
    let value_selector = parse_selector(selectors.spec_value.as_deref());

    for row in document.select(&row_selector) {
        let pair = match (&label_selector, &value_selector) {
            (Some(label_sel), Some(value_sel)) => {
                let label = row.select(label_sel).next().map(element_text);
                let value = row.select(value_sel).next().map(element_text);
                label.zip(value)
            }
            _ => sibling_pair(row),
        };

        if let Some((label, value)) = pair {
            if !label.is_empty() && !value.is_empty() && label != value {
                specs.insert(label, value);
            }
        }
    }
    specs
}

fn sibling_pair(row: ElementRef<'_>) -> Option<(String, String)> {
    let value = row.next_siblings().find_map(ElementRef::wrap)?;
    if value.value().name() == row.value().name() {
        return None;
    }
    Some((element_text(row), element_text(value)))
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn raw_text(document: &Html) -> String {
    let body_selector = Selector::parse("body").ok();
    let root = body_selector
        .as_ref()
        .and_then(|selector| document.select(selector).next())
        .unwrap_or_else(|| document.root_element());

    let mut buffer = String::new();
    collect_visible_text(root, &mut buffer);
    collapse_whitespace(&buffer)
        .chars()
        .take(MAX_RAW_TEXT_CHARS)
        .collect()
}

fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(el) if STRIPPED_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_visible_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "html_test.rs"]
mod tests;
