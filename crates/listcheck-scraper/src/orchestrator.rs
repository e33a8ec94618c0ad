//! The extraction waterfall.
//!
//! Resolves a site profile for the target, orders the strategies (the
//! profile's preference first, then api → static-html → headless-browser)
//! and runs them one at a time until one hits. Every failure is folded into
//! the returned [`ExtractionResult`]; nothing here returns an error.

use std::sync::Arc;
use std::time::Duration;

use listcheck_core::{
    AttemptOutcome, ExtractionResult, ProfileStore, SiteProfile, Strategy, StrategyAttempt,
    StrategyTag,
};

use crate::error::ExtractError;
use crate::outcome::{MissReason, PageCapture, StrategyOutcome};
use crate::settings::ExtractSettings;
use crate::{api, browser, static_html, PageRenderer};

/// Source key used when neither an explicit key nor host detection resolves
/// a profile.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// One extraction call: the target plus optional hints.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractRequest<'a> {
    pub url: &'a str,
    /// Explicit source key; overrides host detection.
    pub source: Option<&'a str>,
    pub brand: Option<&'a str>,
    pub model: Option<&'a str>,
}

/// Preferred strategy first, then the rest in default order, no repeats.
#[must_use]
pub fn strategy_order(preferred: Option<Strategy>) -> Vec<Strategy> {
    preferred
        .into_iter()
        .chain(
            Strategy::DEFAULT_ORDER
                .into_iter()
                .filter(|s| Some(*s) != preferred),
        )
        .collect()
}

pub struct Extractor {
    client: reqwest::Client,
    renderer: Arc<dyn PageRenderer>,
    profiles: ProfileStore,
    settings: ExtractSettings,
}

impl Extractor {
    /// # Errors
    ///
    /// Returns [`ExtractError::Http`] if the HTTP client cannot be built.
    pub fn new(
        profiles: ProfileStore,
        renderer: Arc<dyn PageRenderer>,
        settings: ExtractSettings,
    ) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&settings.user_agent)
            .build()?;
        Ok(Self {
            client,
            renderer,
            profiles,
            settings,
        })
    }

    #[must_use]
    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    /// Resolve the source key and profile for a target. An explicit key wins
    /// even when no profile exists for it.
    #[must_use]
    pub fn resolve_source(
        &self,
        url: &str,
        explicit: Option<&str>,
    ) -> (String, Option<&SiteProfile>) {
        if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
            return (key.to_string(), self.profiles.get(key));
        }
        match self.profiles.detect(url) {
            Some(profile) => (profile.key.clone(), Some(profile)),
            None => (UNKNOWN_SOURCE.to_string(), None),
        }
    }

    /// Run the waterfall for one target. Always returns a result.
    pub async fn extract(&self, request: &ExtractRequest<'_>) -> ExtractionResult {
        let (source, profile) = self.resolve_source(request.url, request.source);

        if let Some(profile) = profile.filter(|p| p.disabled) {
            tracing::info!(
                source = %source,
                url = request.url,
                reason = profile.disabled_reason.as_deref().unwrap_or("unspecified"),
                "source disabled, skipping extraction"
            );
            return ExtractionResult::empty(
                source,
                request.url,
                StrategyTag::SkippedDisabled,
                Vec::new(),
            );
        }

        let order = strategy_order(profile.and_then(|p| p.preferred_strategy));
        let mut attempts = Vec::with_capacity(order.len());

        for strategy in order {
            match self.run_strategy(strategy, profile, request).await {
                StrategyOutcome::Hit(capture) => {
                    tracing::debug!(source = %source, url = request.url, %strategy, "strategy hit");
                    attempts.push(StrategyAttempt {
                        strategy,
                        outcome: AttemptOutcome::Hit,
                    });
                    return build_hit(source, request.url, strategy, capture, attempts);
                }
                StrategyOutcome::Miss(reason) => {
                    tracing::debug!(
                        source = %source,
                        url = request.url,
                        %strategy,
                        %reason,
                        "strategy missed"
                    );
                    attempts.push(StrategyAttempt {
                        strategy,
                        outcome: AttemptOutcome::Miss {
                            reason: reason.to_string(),
                        },
                    });
                }
            }
        }

        tracing::info!(source = %source, url = request.url, "every strategy missed");
        ExtractionResult::empty(source, request.url, StrategyTag::None, attempts)
    }

    async fn run_strategy(
        &self,
        strategy: Strategy,
        profile: Option<&SiteProfile>,
        request: &ExtractRequest<'_>,
    ) -> StrategyOutcome {
        let selectors = profile.and_then(SiteProfile::selectors);
        match strategy {
            Strategy::Api => {
                let Some(api_descriptor) = profile.and_then(SiteProfile::api) else {
                    return StrategyOutcome::Miss(MissReason::NoApiDescriptor);
                };
                let hints = request
                    .brand
                    .filter(|b| !b.trim().is_empty())
                    .zip(request.model.filter(|m| !m.trim().is_empty()));
                let Some((brand, model)) = hints else {
                    return StrategyOutcome::Miss(MissReason::MissingHints);
                };
                api::extract(&self.client, api_descriptor, brand, model, &self.settings).await
            }
            Strategy::StaticHtml => {
                static_html::extract(&self.client, request.url, selectors, &self.settings).await
            }
            Strategy::HeadlessBrowser => {
                browser::extract(self.renderer.as_ref(), request.url, selectors, &self.settings)
                    .await
            }
        }
    }

    /// Close the shared browser engine. Call once at process shutdown.
    pub async fn shutdown(&self) {
        self.renderer.shutdown().await;
    }
}

fn build_hit(
    source: String,
    url: &str,
    strategy: Strategy,
    capture: PageCapture,
    attempts: Vec<StrategyAttempt>,
) -> ExtractionResult {
    ExtractionResult {
        source,
        url: url.to_string(),
        data: capture.data,
        raw_text: capture.raw_text,
        strategy: StrategyTag::Succeeded(strategy),
        attempts,
        extracted_at: chrono::Utc::now(),
    }
}
