//! API strategy: one JSON GET against a source's declared endpoint.

use std::collections::BTreeMap;

use listcheck_core::{ApiDescriptor, ApiMapping, ExtractedData};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use crate::error::ExtractError;
use crate::json_path::{resolve, resolve_text, to_text};
use crate::outcome::{MissReason, PageCapture, StrategyOutcome};
use crate::settings::ExtractSettings;

/// Characters left unescaped in a path component, matching what browsers
/// leave alone when encoding a URI component.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build the request URL: `endpoint` followed by `path_template` with
/// `{brand}` and `{model}` substituted URL-encoded.
#[must_use]
pub fn build_api_url(api: &ApiDescriptor, brand: &str, model: &str) -> String {
    let path = api
        .path_template
        .replace("{brand}", &utf8_percent_encode(brand.trim(), COMPONENT).to_string())
        .replace("{model}", &utf8_percent_encode(model.trim(), COMPONENT).to_string());
    format!("{}{}", api.endpoint.trim(), path)
}

/// Run the API strategy. Any transport failure, non-2xx status, timeout or
/// undecodable body is a miss.
pub async fn extract(
    client: &reqwest::Client,
    api: &ApiDescriptor,
    brand: &str,
    model: &str,
    settings: &ExtractSettings,
) -> StrategyOutcome {
    let url = build_api_url(api, brand, model);
    match fetch_json(client, &url, &api.headers, settings).await {
        Ok(body) => {
            let data = map_response(&body, &api.mapping);
            if data.is_empty() {
                tracing::debug!(url, "API responded but no mapped field resolved");
                StrategyOutcome::Miss(MissReason::EmptyMapping)
            } else {
                StrategyOutcome::Hit(PageCapture {
                    data,
                    raw_text: None,
                })
            }
        }
        Err(error) => {
            tracing::debug!(url, %error, "API strategy missed");
            StrategyOutcome::Miss(error.into())
        }
    }
}

async fn fetch_json(
    client: &reqwest::Client,
    url: &str,
    extra_headers: &BTreeMap<String, String>,
    settings: &ExtractSettings,
) -> Result<Value, ExtractError> {
    let response = client
        .get(url)
        .timeout(settings.api_timeout)
        .header(reqwest::header::ACCEPT, "application/json")
        .headers(header_map(extra_headers)?)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExtractError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }

    let body = response.text().await?;
    serde_json::from_str::<Value>(&body).map_err(|source| ExtractError::Deserialize {
        context: format!("API response from {url}"),
        source,
    })
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, ExtractError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let invalid = |reason: String| ExtractError::InvalidHeader {
            name: name.clone(),
            reason,
        };
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Apply the profile's path mapping to a decoded response.
#[must_use]
pub fn map_response(body: &Value, mapping: &ApiMapping) -> ExtractedData {
    let title = mapping.title.as_deref().and_then(|p| resolve_text(body, p));
    let price = mapping.price.as_deref().and_then(|p| resolve_text(body, p));

    let specs = mapping
        .specs
        .iter()
        .filter_map(|(field, path)| resolve_text(body, path).map(|v| (field.clone(), v)))
        .collect();

    let variants = mapping
        .variants
        .as_deref()
        .and_then(|p| resolve(body, p))
        .map(|value| variant_names(value, mapping.variant_name.as_deref()))
        .unwrap_or_default();

    ExtractedData {
        title,
        price,
        specs,
        variants,
    }
}

fn variant_names(value: &Value, name_path: Option<&str>) -> Vec<String> {
    let name_of = |item: &Value| match name_path {
        Some(path) => resolve_text(item, path),
        None => to_text(item),
    };
    match value {
        Value::Array(items) => items.iter().filter_map(name_of).collect(),
        single => name_of(single).into_iter().collect(),
    }
}
