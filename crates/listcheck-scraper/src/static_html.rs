//! Static-HTML strategy: fetch the page over plain HTTP and parse it without
//! running any script.

use listcheck_core::SelectorDescriptor;

use crate::error::ExtractError;
use crate::html::{extract_page, is_usable, raw_text_chars};
use crate::outcome::{MissReason, StrategyOutcome};
use crate::retry::retry_linear;
use crate::settings::ExtractSettings;

/// Fetch `url` (with retries) and extract from the returned markup.
pub async fn extract(
    client: &reqwest::Client,
    url: &str,
    selectors: Option<&SelectorDescriptor>,
    settings: &ExtractSettings,
) -> StrategyOutcome {
    let body = match fetch_page(client, url, settings).await {
        Ok(body) => body,
        Err(error) => {
            tracing::debug!(url, %error, "static page fetch exhausted retries");
            return StrategyOutcome::Miss(error.into());
        }
    };

    let capture = extract_page(&body, selectors);
    if is_usable(&capture) {
        StrategyOutcome::Hit(capture)
    } else {
        let text_chars = raw_text_chars(&capture);
        tracing::debug!(url, text_chars, "static page too sparse");
        StrategyOutcome::Miss(MissReason::TooSparse { text_chars })
    }
}

/// GET `url` with browser-like headers; a non-2xx status or blank body
/// counts as a failed attempt.
///
/// # Errors
///
/// Returns the last attempt's [`ExtractError`] once every attempt failed.
pub async fn fetch_page(
    client: &reqwest::Client,
    url: &str,
    settings: &ExtractSettings,
) -> Result<String, ExtractError> {
    retry_linear(
        settings.html_max_attempts,
        settings.html_backoff_base,
        move |attempt| async move {
            tracing::debug!(url, attempt, "fetching static page");
            let response = client
                .get(url)
                .timeout(settings.html_timeout)
                .header(reqwest::header::USER_AGENT, &settings.user_agent)
                .header(
                    reqwest::header::ACCEPT,
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                )
                .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                .header(reqwest::header::CACHE_CONTROL, "no-cache")
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
            if body.trim().is_empty() {
                return Err(ExtractError::EmptyBody {
                    url: url.to_owned(),
                });
            }
            Ok(body)
        },
    )
    .await
}
