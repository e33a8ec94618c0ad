//! Headless-browser strategy.
//!
//! Rendering sits behind [`PageRenderer`] so the waterfall never depends on
//! a concrete engine; [`BrowserManager`] is the Chromium implementation.

mod chromium;

use std::time::Duration;

use async_trait::async_trait;
use listcheck_core::SelectorDescriptor;
use thiserror::Error;

use crate::html::{extract_page, is_usable, raw_text_chars};
use crate::outcome::{MissReason, StrategyOutcome};
use crate::settings::ExtractSettings;

pub use chromium::{BrowserLaunchOptions, BrowserManager, EngineState};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("browser has been shut down")]
    Stopped,

    #[error("failed to open browsing context: {0}")]
    Context(String),

    #[error("navigation to {url} timed out after {timeout_secs}s")]
    NavigationTimeout { url: String, timeout_secs: u64 },

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("failed to read rendered page: {0}")]
    Evaluate(String),
}

/// One page render.
#[derive(Debug, Clone)]
pub struct RenderRequest<'a> {
    pub url: &'a str,
    /// Selector worth waiting for after the settle period, if any.
    pub wait_for: Option<&'a str>,
    pub nav_timeout: Duration,
    pub settle: Duration,
    pub selector_wait: Duration,
}

/// A browser engine able to render a URL in an isolated context and return
/// the resulting document markup.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Render `request.url` and return the document's outer HTML. The
    /// browsing context used for the render is closed before returning on
    /// every path.
    async fn render(&self, request: &RenderRequest<'_>) -> Result<String, RenderError>;

    /// Release the engine. Called once at process shutdown.
    async fn shutdown(&self) {}
}

/// Render `url` and apply the same extraction rules as the static-HTML
/// strategy to the rendered document.
pub async fn extract(
    renderer: &dyn PageRenderer,
    url: &str,
    selectors: Option<&SelectorDescriptor>,
    settings: &ExtractSettings,
) -> StrategyOutcome {
    let request = RenderRequest {
        url,
        wait_for: selectors.and_then(|s| s.title.as_deref()),
        nav_timeout: settings.browser_nav_timeout,
        settle: settings.browser_settle,
        selector_wait: settings.browser_selector_wait,
    };

    let html = match renderer.render(&request).await {
        Ok(html) => html,
        Err(error) => {
            tracing::debug!(url, %error, "browser render failed");
            return StrategyOutcome::Miss(error.into());
        }
    };

    let capture = extract_page(&html, selectors);
    if is_usable(&capture) {
        StrategyOutcome::Hit(capture)
    } else {
        StrategyOutcome::Miss(MissReason::TooSparse {
            text_chars: raw_text_chars(&capture),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct RecordingRenderer {
        html: Result<String, ()>,
        seen_wait_for: Mutex<Option<String>>,
    }

    #[async_trait]
    impl PageRenderer for RecordingRenderer {
        async fn render(&self, request: &RenderRequest<'_>) -> Result<String, RenderError> {
            *self.seen_wait_for.lock().unwrap() = request.wait_for.map(str::to_owned);
            self.html.clone().map_err(|()| RenderError::NavigationTimeout {
                url: request.url.to_owned(),
                timeout_secs: 30,
            })
        }
    }

    #[tokio::test]
    async fn waits_for_title_selector_and_extracts() {
        let renderer = RecordingRenderer {
            html: Ok("<body><h1>Ioniq 5</h1></body>".to_string()),
            seen_wait_for: Mutex::new(None),
        };
        let selectors = SelectorDescriptor {
            title: Some("h1".to_string()),
            ..SelectorDescriptor::default()
        };
        let outcome = extract(
            &renderer,
            "https://example.com/ioniq-5",
            Some(&selectors),
            &ExtractSettings::default(),
        )
        .await;
        let StrategyOutcome::Hit(capture) = outcome else {
            panic!("expected hit, got {outcome:?}");
        };
        assert_eq!(capture.data.title.as_deref(), Some("Ioniq 5"));
        assert_eq!(renderer.seen_wait_for.lock().unwrap().as_deref(), Some("h1"));
    }

    #[tokio::test]
    async fn navigation_timeout_is_a_timeout_miss() {
        let renderer = RecordingRenderer {
            html: Err(()),
            seen_wait_for: Mutex::new(None),
        };
        let outcome = extract(
            &renderer,
            "https://example.com/slow",
            None,
            &ExtractSettings::default(),
        )
        .await;
        assert!(matches!(outcome, StrategyOutcome::Miss(MissReason::Timeout)));
    }

    #[tokio::test]
    async fn empty_render_is_too_sparse() {
        let renderer = RecordingRenderer {
            html: Ok("<body></body>".to_string()),
            seen_wait_for: Mutex::new(None),
        };
        let outcome = extract(&renderer, "https://example.com/", None, &ExtractSettings::default())
            .await;
        assert!(matches!(
            outcome,
            StrategyOutcome::Miss(MissReason::TooSparse { text_chars: 0 })
        ));
    }
}
