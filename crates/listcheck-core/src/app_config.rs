use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Production logs go to collectors that do not render ANSI colour.
    #[must_use]
    pub fn colored_logs(&self) -> bool {
        !matches!(self, Environment::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide settings read from `LISTCHECK_*` environment variables.
///
/// Timeouts and delays are kept as raw numbers; the binary projects them
/// into the extractor's settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub profiles_dir: PathBuf,
    pub user_agent: String,
    pub api_timeout_secs: u64,
    pub html_timeout_secs: u64,
    pub html_max_attempts: u32,
    pub html_backoff_base_ms: u64,
    pub browser_nav_timeout_secs: u64,
    pub browser_settle_ms: u64,
    pub browser_selector_wait_ms: u64,
    pub chromium_path: Option<PathBuf>,
}
