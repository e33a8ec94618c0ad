//! Dotted/bracketed path access into arbitrary JSON.
//!
//! `data.results[0].price` walks key `data`, key `results`, index `0`, key
//! `price`. Any segment that does not resolve yields `None`.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'p> {
    Key(&'p str),
    Index(usize),
}

/// Resolve `path` against `value`. An empty path resolves to `value` itself.
#[must_use]
pub fn resolve<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    let path = path.trim();
    if path.is_empty() {
        return Some(value);
    }
    let (segment, rest) = next_segment(path)?;
    let child = match segment {
        Segment::Key(key) => value.as_object()?.get(key)?,
        Segment::Index(idx) => value.as_array()?.get(idx)?,
    };
    resolve(child, rest)
}

/// Split the leading segment off `path`, returning it with the remainder.
fn next_segment(path: &str) -> Option<(Segment<'_>, &str)> {
    if let Some(inner) = path.strip_prefix('[') {
        let close = inner.find(']')?;
        let idx = inner[..close].trim().parse::<usize>().ok()?;
        let rest = &inner[close + 1..];
        return Some((Segment::Index(idx), rest.strip_prefix('.').unwrap_or(rest)));
    }

    let end = path.find(['.', '[']).unwrap_or(path.len());
    let key = path[..end].trim();
    if key.is_empty() {
        return None;
    }
    let rest = &path[end..];
    Some((Segment::Key(key), rest.strip_prefix('.').unwrap_or(rest)))
}

/// Render a scalar (or array of scalars) as display text. Objects, nulls and
/// blank strings yield `None`.
#[must_use]
pub fn to_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(to_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Resolve `path` and render the result with [`to_text`].
#[must_use]
pub fn resolve_text(value: &Value, path: &str) -> Option<String> {
    resolve(value, path).and_then(to_text)
}
