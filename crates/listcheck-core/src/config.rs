use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Browser-like default user agent. Plenty of listing sites serve reduced
/// markup (or a challenge page) to anything that looks like a bot.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("LISTCHECK_ENV", "development"));
    let log_level = or_default("LISTCHECK_LOG_LEVEL", "info");
    let profiles_dir = PathBuf::from(or_default("LISTCHECK_PROFILES_DIR", "./config/sites"));
    let user_agent = or_default("LISTCHECK_USER_AGENT", DEFAULT_USER_AGENT);

    let api_timeout_secs = parse_u64("LISTCHECK_API_TIMEOUT_SECS", "10")?;
    let html_timeout_secs = parse_u64("LISTCHECK_HTML_TIMEOUT_SECS", "15")?;
    let html_max_attempts = parse_u32("LISTCHECK_HTML_MAX_ATTEMPTS", "3")?;
    if html_max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "LISTCHECK_HTML_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let html_backoff_base_ms = parse_u64("LISTCHECK_HTML_BACKOFF_BASE_MS", "1000")?;
    let browser_nav_timeout_secs = parse_u64("LISTCHECK_BROWSER_NAV_TIMEOUT_SECS", "30")?;
    let browser_settle_ms = parse_u64("LISTCHECK_BROWSER_SETTLE_MS", "2000")?;
    let browser_selector_wait_ms = parse_u64("LISTCHECK_BROWSER_SELECTOR_WAIT_MS", "3000")?;
    let chromium_path = lookup("LISTCHECK_CHROMIUM_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        profiles_dir,
        user_agent,
        api_timeout_secs,
        html_timeout_secs,
        html_max_attempts,
        html_backoff_base_ms,
        browser_nav_timeout_secs,
        browser_settle_ms,
        browser_selector_wait_ms,
        chromium_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
