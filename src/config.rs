//! Client configuration, read from `SLOTDESK_*` environment variables.

use crate::grid::InteriorTapPolicy;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g. "https://api.example.com")
    pub base_url: String,
    /// Bearer token attached to every request
    pub token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    pub interior_tap: InteriorTapPolicy,
    /// Prometheus exporter port; no exporter when unset
    pub metrics_port: Option<u16>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            interior_tap: InteriorTapPolicy::default(),
            metrics_port: None,
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value lookup. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("SLOTDESK_API_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.into());
        let token = lookup("SLOTDESK_TOKEN").filter(|s| !s.trim().is_empty());
        let timeout_secs = lookup("SLOTDESK_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .filter(|&t: &u64| t > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let interior_tap = match lookup("SLOTDESK_INTERIOR_TAP") {
            Some(s) => s.parse().unwrap_or_else(|e| {
                tracing::warn!("{e}, using restart");
                InteriorTapPolicy::default()
            }),
            None => InteriorTapPolicy::default(),
        };
        let metrics_port = lookup("SLOTDESK_METRICS_PORT").and_then(|s| s.parse().ok());

        Self {
            base_url,
            token,
            timeout_secs,
            interior_tap,
            metrics_port,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
