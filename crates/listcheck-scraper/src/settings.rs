use std::time::Duration;

/// Per-attempt budgets for the waterfall.
#[derive(Debug, Clone)]
pub struct ExtractSettings {
    pub user_agent: String,
    pub api_timeout: Duration,
    pub html_timeout: Duration,
    /// Total static-HTML attempts, including the first.
    pub html_max_attempts: u32,
    /// Delay before retry `n` is `html_backoff_base * n`.
    pub html_backoff_base: Duration,
    pub browser_nav_timeout: Duration,
    pub browser_settle: Duration,
    pub browser_selector_wait: Duration,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            user_agent: listcheck_core::config::DEFAULT_USER_AGENT.to_string(),
            api_timeout: Duration::from_secs(10),
            html_timeout: Duration::from_secs(15),
            html_max_attempts: 3,
            html_backoff_base: Duration::from_secs(1),
            browser_nav_timeout: Duration::from_secs(30),
            browser_settle: Duration::from_secs(2),
            browser_selector_wait: Duration::from_secs(3),
        }
    }
}

impl From<&listcheck_core::AppConfig> for ExtractSettings {
    fn from(config: &listcheck_core::AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            api_timeout: Duration::from_secs(config.api_timeout_secs),
            html_timeout: Duration::from_secs(config.html_timeout_secs),
            html_max_attempts: config.html_max_attempts.max(1),
            html_backoff_base: Duration::from_millis(config.html_backoff_base_ms),
            browser_nav_timeout: Duration::from_secs(config.browser_nav_timeout_secs),
            browser_settle: Duration::from_millis(config.browser_settle_ms),
            browser_selector_wait: Duration::from_millis(config.browser_selector_wait_ms),
        }
    }
}
