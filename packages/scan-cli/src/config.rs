use anyhow::{Context, Result};
use dotenvy::dotenv;
use lead_scanner::{ScanConfig, DEFAULT_USER_AGENT};
use std::env;

pub const DEFAULT_CONCURRENCY: usize = 5;

/// Runner configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub timeout_secs: u64,
    pub max_body_bytes: usize,
    pub user_agent: String,
    pub concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = ScanConfig::default();

        Ok(Self {
            timeout_secs: lookup("LEAD_SCAN_TIMEOUT_SECS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("LEAD_SCAN_TIMEOUT_SECS must be a whole number of seconds")?
                .unwrap_or(defaults.timeout_secs),
            max_body_bytes: lookup("LEAD_SCAN_MAX_BODY_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("LEAD_SCAN_MAX_BODY_BYTES must be a valid number")?
                .unwrap_or(defaults.max_body_bytes),
            user_agent: lookup("LEAD_SCAN_USER_AGENT")
                .filter(|ua| !ua.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            concurrency: lookup("LEAD_SCAN_CONCURRENCY")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("LEAD_SCAN_CONCURRENCY must be a valid number")?
                .unwrap_or(DEFAULT_CONCURRENCY),
        })
    }

    /// Fetch policy handed to the scanner.
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig::new()
            .with_timeout_secs(self.timeout_secs)
            .with_max_body_bytes(self.max_body_bytes)
            .with_user_agent(self.user_agent.clone())
    }
}
