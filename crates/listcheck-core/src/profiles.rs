//! Per-source site profiles and the directory-backed store that holds them.
//!
//! Each profile lives in its own YAML document; the file stem is the source
//! key. A malformed document is logged and skipped so one bad profile never
//! takes the rest of the store down with it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::extraction::Strategy;
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Source key. Filled from the file stem when omitted in the document.
    #[serde(default)]
    pub key: String,
    pub name: String,
    pub base_url: String,
    #[serde(default)]
    pub disabled: bool,
    pub disabled_reason: Option<String>,
    pub preferred_strategy: Option<Strategy>,
    #[serde(default)]
    pub extractors: Vec<ExtractorSpec>,
}

/// How a source exposes its data. A profile carries at most one of each kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractorSpec {
    Api(ApiDescriptor),
    Selectors(SelectorDescriptor),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDescriptor {
    pub endpoint: String,
    /// Appended to `endpoint`; `{brand}` and `{model}` are substituted
    /// URL-encoded.
    pub path_template: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub mapping: ApiMapping,
}

/// Dotted/indexed paths (`data.results[0].price`) into the JSON response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMapping {
    pub title: Option<String>,
    pub price: Option<String>,
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
    pub variants: Option<String>,
    /// Applied to each element of `variants` when the elements are objects.
    pub variant_name: Option<String>,
}

/// CSS selectors for pages rendered either statically or in a browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorDescriptor {
    pub title: Option<String>,
    pub price: Option<String>,
    pub spec_row: Option<String>,
    pub spec_label: Option<String>,
    pub spec_value: Option<String>,
    pub variants: Option<String>,
}

impl SiteProfile {
    #[must_use]
    pub fn api(&self) -> Option<&ApiDescriptor> {
        self.extractors.iter().find_map(|spec| match spec {
            ExtractorSpec::Api(api) => Some(api),
            ExtractorSpec::Selectors(_) => None,
        })
    }

    #[must_use]
    pub fn selectors(&self) -> Option<&SelectorDescriptor> {
        self.extractors.iter().find_map(|spec| match spec {
            ExtractorSpec::Selectors(selectors) => Some(selectors),
            ExtractorSpec::Api(_) => None,
        })
    }

    /// Host of `base_url`, lowercased with any `www.` prefix removed.
    #[must_use]
    pub fn host(&self) -> Option<String> {
        normalized_host(&self.base_url)
    }
}

/// Lowercased host of `raw` without a leading `www.`.
#[must_use]
pub fn normalized_host(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    Some(host.strip_prefix("www.").map_or_else(|| host.clone(), str::to_owned))
}

/// Parse one profile document.
///
/// # Errors
///
/// Returns [`ConfigError::ProfileParse`] for malformed YAML and
/// [`ConfigError::ProfileValidation`] when the document is structurally
/// valid but unusable.
pub fn parse_profile(key: &str, yaml: &str) -> Result<SiteProfile, ConfigError> {
    let mut profile: SiteProfile =
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::ProfileParse {
            key: key.to_string(),
            source,
        })?;
    if profile.key.trim().is_empty() {
        key.clone_into(&mut profile.key);
    }
    validate_profile(&profile)?;
    Ok(profile)
}

fn validate_profile(profile: &SiteProfile) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::ProfileValidation {
        key: profile.key.clone(),
        reason,
    };

    if profile.name.trim().is_empty() {
        return Err(invalid("name must be non-empty".to_string()));
    }
    if profile.host().is_none() {
        return Err(invalid(format!(
            "base_url '{}' is not an absolute URL with a host",
            profile.base_url
        )));
    }

    let api_count = profile
        .extractors
        .iter()
        .filter(|s| matches!(s, ExtractorSpec::Api(_)))
        .count();
    let selector_count = profile.extractors.len() - api_count;
    if api_count > 1 || selector_count > 1 {
        return Err(invalid(
            "at most one api and one selectors extractor may be declared".to_string(),
        ));
    }

    if let Some(api) = profile.api() {
        if api.endpoint.trim().is_empty() {
            return Err(invalid("api endpoint must be non-empty".to_string()));
        }
        if api.path_template.trim().is_empty() {
            return Err(invalid("api path_template must be non-empty".to_string()));
        }
    }

    Ok(())
}

/// Read-only collection of site profiles keyed by source key.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    profiles: BTreeMap<String, SiteProfile>,
}

impl ProfileStore {
    #[must_use]
    pub fn from_profiles(profiles: impl IntoIterator<Item = SiteProfile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.key.clone(), profile))
                .collect(),
        }
    }

    /// Load every `*.yaml` / `*.yml` document in `dir`.
    ///
    /// A missing directory yields an empty store. Malformed documents are
    /// logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ProfileIo`] if the directory exists but cannot
    /// be listed.
    pub fn load_dir(dir: &Path) -> Result<Self, ConfigError> {
        if !dir.exists() {
            tracing::warn!(
                dir = %dir.display(),
                "site profile directory not found; extraction falls back to raw page text"
            );
            return Ok(Self::default());
        }

        let entries = std::fs::read_dir(dir).map_err(|source| ConfigError::ProfileIo {
            path: dir.display().to_string(),
            source,
        })?;

        let mut paths: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
            })
            .collect();
        paths.sort();

        let mut profiles = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match load_profile_file(key, &path) {
                Ok(profile) => profiles.push(profile),
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "skipping site profile");
                }
            }
        }

        tracing::debug!(count = profiles.len(), dir = %dir.display(), "loaded site profiles");
        Ok(Self::from_profiles(profiles))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SiteProfile> {
        self.profiles.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Find the profile whose base host equals the target's host or is a
    /// parent domain of it. The most specific (longest) matching host wins;
    /// equally specific hosts resolve to the first profile in key order.
    #[must_use]
    pub fn detect(&self, target_url: &str) -> Option<&SiteProfile> {
        let target = normalized_host(target_url)?;
        self.profiles
            .values()
            .filter_map(|profile| {
                let host = profile.host()?;
                let covers = target == host
                    || target
                        .strip_suffix(host.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'));
                covers.then_some((host.len(), profile))
            })
            .fold(None::<(usize, &SiteProfile)>, |best, candidate| match best {
                Some((len, _)) if len >= candidate.0 => best,
                _ => Some(candidate),
            })
            .map(|(_, profile)| profile)
    }
}

fn load_profile_file(key: &str, path: &Path) -> Result<SiteProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ProfileIo {
        path: path.display().to_string(),
        source,
    })?;
    parse_profile(key, &content)
}

#[cfg(test)]
#[path = "profiles_test.rs"]
mod tests;
