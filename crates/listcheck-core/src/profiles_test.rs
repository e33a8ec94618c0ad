use std::path::Path;

use super::*;

fn profile(key: &str, base_url: &str) -> SiteProfile {
    SiteProfile {
        key: key.to_string(),
        name: key.to_uppercase(),
        base_url: base_url.to_string(),
        disabled: false,
        disabled_reason: None,
        preferred_strategy: None,
        extractors: vec![],
    }
}

#[test]
fn parse_profile_fills_key_from_file_stem() {
    let yaml = "name: Example\nbase_url: https://example.com\n";
    let parsed = parse_profile("example", yaml).unwrap();
    assert_eq!(parsed.key, "example");
    assert!(parsed.api().is_none());
    assert!(parsed.selectors().is_none());
}

#[test]
fn parse_profile_reads_tagged_extractors() {
    let yaml = r"
name: Example
base_url: https://example.com
preferred_strategy: headless-browser
extractors:
  - kind: api
    endpoint: https://api.example.com
    path_template: /search/{brand}/{model}
    mapping:
      price: data.results[0].price
  - kind: selectors
    title: h1
";
    let parsed = parse_profile("example", yaml).unwrap();
    assert_eq!(parsed.preferred_strategy, Some(Strategy::HeadlessBrowser));
    let api = parsed.api().unwrap();
    assert_eq!(api.path_template, "/search/{brand}/{model}");
    assert_eq!(api.mapping.price.as_deref(), Some("data.results[0].price"));
    assert_eq!(parsed.selectors().unwrap().title.as_deref(), Some("h1"));
}

#[test]
fn parse_profile_rejects_malformed_yaml() {
    let err = parse_profile("broken", "name: [unterminated").unwrap_err();
    assert!(matches!(err, ConfigError::ProfileParse { .. }));
}

#[test]
fn parse_profile_rejects_relative_base_url() {
    let err = parse_profile("bad", "name: Bad\nbase_url: example.com\n").unwrap_err();
    assert!(err.to_string().contains("not an absolute URL"));
}

#[test]
fn parse_profile_rejects_duplicate_extractor_kinds() {
    let yaml = r"
name: Twice
base_url: https://example.com
extractors:
  - kind: selectors
    title: h1
  - kind: selectors
    title: h2
";
    let err = parse_profile("twice", yaml).unwrap_err();
    assert!(err.to_string().contains("at most one"));
}

#[test]
fn parse_profile_rejects_blank_api_template() {
    let yaml = r#"
name: Blank
base_url: https://example.com
extractors:
  - kind: api
    endpoint: https://api.example.com
    path_template: ""
"#;
    let err = parse_profile("blank", yaml).unwrap_err();
    assert!(err.to_string().contains("path_template"));
}

#[test]
fn detect_matches_exact_host_and_subdomains() {
    let store = ProfileStore::from_profiles([
        profile("alpha", "https://www.alpha-cars.example"),
        profile("beta", "https://beta.example"),
    ]);
    assert_eq!(
        store.detect("https://alpha-cars.example/listing/1").map(|p| p.key.as_str()),
        Some("alpha")
    );
    assert_eq!(
        store.detect("https://uae.beta.example/cars?id=2").map(|p| p.key.as_str()),
        Some("beta")
    );
}

#[test]
fn detect_prefers_the_most_specific_host() {
    let store = ProfileStore::from_profiles([
        profile("a_generic", "https://example.com"),
        profile("b_uae", "https://uae.example.com"),
        profile("c_generic_copy", "https://www.example.com"),
    ]);
    assert_eq!(
        store.detect("https://uae.example.com/car").map(|p| p.key.as_str()),
        Some("b_uae")
    );
    assert_eq!(
        store.detect("https://shop.uae.example.com/car").map(|p| p.key.as_str()),
        Some("b_uae")
    );
    assert_eq!(
        store.detect("https://example.com/x").map(|p| p.key.as_str()),
        Some("a_generic")
    );
}

#[test]
fn detect_does_not_match_suffix_without_dot() {
    let store = ProfileStore::from_profiles([profile("beta", "https://beta.example")]);
    assert!(store.detect("https://notbeta.example/").is_none());
    assert!(store.detect("not a url").is_none());
}

#[test]
fn load_dir_skips_malformed_documents() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("good.yaml"),
        "name: Good\nbase_url: https://good.example\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("bad.yaml"), "name: [oops").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let store = ProfileStore::load_dir(dir.path()).unwrap();
    assert_eq!(store.keys().collect::<Vec<_>>(), vec!["good"]);
}

#[test]
fn load_dir_missing_directory_is_empty_store() {
    let store = ProfileStore::load_dir(Path::new("/definitely/not/here")).unwrap();
    assert!(store.is_empty());
}

#[test]
fn load_shipped_profiles() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("sites");
    assert!(dir.exists(), "config/sites missing at {dir:?}");
    let store = ProfileStore::load_dir(&dir).unwrap();
    assert_eq!(store.len(), 3, "every shipped profile must parse");
    assert!(store.get("motorhub").is_some_and(|p| p.disabled));
    assert!(store.get("evcatalog").and_then(SiteProfile::api).is_some());
}
