//! Scan configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifies the scanner to the sites it visits.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; Lead2Close/1.0; +http://lead2close.com)";

/// Fetch policy shared by the primary and contact-page fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Wall-clock deadline per fetch, in seconds.
    ///
    /// Covers connect, redirects and body download. Default: 12.
    pub timeout_secs: u64,

    /// Largest body accepted, in bytes. Default: 1,500,000.
    pub max_body_bytes: usize,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 12,
            max_body_bytes: 1_500_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScanConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-fetch deadline.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the body size cap.
    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
