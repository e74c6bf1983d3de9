//! Client configuration.

use std::time::Duration;

/// Default backend URL for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default idle window before a stalled stream is treated as failed.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 120;

/// Configuration for the Gamma API client.
///
/// # Example
///
/// ```ignore
/// use gamma_client::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_base_url("https://gamma.internal")
///     .with_idle_timeout_secs(30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the Gamma backend
    pub base_url: String,
    /// Seconds without a stream event before the exchange fails.
    /// The protocol itself defines no timeout; this is the client-side
    /// fail-safe for a stalled transport.
    pub idle_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend base URL. A trailing slash is stripped so endpoint
    /// paths join cleanly.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the idle-timeout window in seconds.
    pub fn with_idle_timeout_secs(mut self, secs: u64) -> Self {
        self.idle_timeout_secs = secs;
        self
    }

    /// Build a config from `GAMMA_API_URL` and `GAMMA_IDLE_TIMEOUT_SECS`,
    /// falling back to defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("GAMMA_API_URL") {
            if !url.is_empty() {
                config = config.with_base_url(url);
            }
        }
        if let Ok(secs) = std::env::var("GAMMA_IDLE_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config = config.with_idle_timeout_secs(secs);
            }
        }
        config
    }

    /// The idle window as a `Duration`.
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}
