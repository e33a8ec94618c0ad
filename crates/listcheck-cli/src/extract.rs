//! `extract`: one waterfall run against a single URL.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use listcheck_core::{AppConfig, ExtractionResult, ProfileStore};
use listcheck_scraper::{
    BrowserLaunchOptions, BrowserManager, ExtractRequest, ExtractSettings, Extractor,
};

use crate::input::{print_json, read_json, write_json};

#[derive(Debug)]
pub(crate) struct ExtractArgs {
    pub url: String,
    pub source: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub append: Option<PathBuf>,
}

pub(crate) async fn run_extract(config: &AppConfig, args: ExtractArgs) -> anyhow::Result<()> {
    let profiles = ProfileStore::load_dir(&config.profiles_dir).with_context(|| {
        format!(
            "failed to load site profiles from {}",
            config.profiles_dir.display()
        )
    })?;
    tracing::debug!(profiles = profiles.len(), "site profiles loaded");

    let renderer = Arc::new(BrowserManager::new(BrowserLaunchOptions {
        chromium_path: config.chromium_path.clone(),
    }));
    let extractor = Extractor::new(profiles, renderer, ExtractSettings::from(config))
        .context("failed to build extractor")?;

    let result = extractor
        .extract(&ExtractRequest {
            url: &args.url,
            source: args.source.as_deref(),
            brand: args.brand.as_deref(),
            model: args.model.as_deref(),
        })
        .await;
    extractor.shutdown().await;

    tracing::info!(
        source = %result.source,
        strategy = %result.strategy,
        url = %result.url,
        "extraction finished"
    );

    if let Some(path) = &args.append {
        append_result(path, &result)?;
    }
    print_json(&result)
}

/// Add `result` to the JSON array at `path`, creating the file if needed.
fn append_result(path: &Path, result: &ExtractionResult) -> anyhow::Result<()> {
    let mut results: Vec<ExtractionResult> = if path.exists() {
        read_json(path)?
    } else {
        Vec::new()
    };
    results.push(result.clone());
    write_json(path, &results)
}
