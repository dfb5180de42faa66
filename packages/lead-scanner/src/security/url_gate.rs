//! Normalization and lexical SSRF checks for lead websites.

use std::collections::HashSet;
use std::net::IpAddr;

use url::{Host, Url};

use crate::error::{SecurityError, SecurityResult};

/// URL safety gate.
///
/// Normalizes a lead's website string into an absolute URL and rejects:
/// - Non-HTTP(S) schemes (file://, ftp://)
/// - `localhost` and its subdomains
/// - IP literals in loopback and private ranges (127.x, 10.x, 192.168.x, ...)
///
/// The check is lexical. Host names are never resolved, so a public name
/// that resolves to a private address is not caught here.
#[derive(Debug, Clone)]
pub struct UrlGate {
    /// Allowed URL schemes
    allowed_schemes: HashSet<String>,

    /// Blocked hostnames (exact match, lower-case)
    blocked_hosts: HashSet<String>,

    /// Blocked CIDR ranges for IP-literal hosts
    blocked_cidrs: Vec<ipnet::IpNet>,

    /// Additional allowed hosts (bypass normal validation)
    allowed_hosts: HashSet<String>,
}

impl Default for UrlGate {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlGate {
    /// Create a gate with the default blocked hosts and ranges.
    pub fn new() -> Self {
        let blocked_cidrs = [
            "127.0.0.0/8",    // Loopback
            "10.0.0.0/8",     // Private
            "192.168.0.0/16", // Private
            "172.16.0.0/12",  // Private
            "169.254.0.0/16", // Link-local / cloud metadata
            "0.0.0.0/8",
            "::1/128",   // IPv6 loopback
            "fc00::/7",  // IPv6 private
            "fe80::/10", // IPv6 link-local
        ]
        .into_iter()
        .filter_map(|cidr| cidr.parse().ok())
        .collect();

        Self {
            allowed_schemes: ["http", "https"].into_iter().map(String::from).collect(),
            blocked_hosts: ["localhost"].into_iter().map(String::from).collect(),
            blocked_cidrs,
            allowed_hosts: HashSet::new(),
        }
    }

    /// Add an allowed host (bypasses the host and range checks).
    pub fn allow_host(mut self, host: impl Into<String>) -> Self {
        self.allowed_hosts.insert(host.into().to_lowercase());
        self
    }

    /// Block an additional host.
    pub fn block_host(mut self, host: impl Into<String>) -> Self {
        self.blocked_hosts.insert(host.into().to_lowercase());
        self
    }

    /// Block an additional CIDR range.
    pub fn block_cidr(mut self, cidr: ipnet::IpNet) -> Self {
        self.blocked_cidrs.push(cidr);
        self
    }

    /// Normalize a raw website string and validate it.
    ///
    /// Inputs without a scheme get `https://` prepended.
    pub fn normalize(&self, raw: &str) -> SecurityResult<Url> {
        let raw = raw.trim();
        let candidate = if raw.contains("://") {
            raw.to_string()
        } else {
            format!("https://{raw}")
        };

        let parsed = Url::parse(&candidate)?;
        self.check(&parsed)?;
        Ok(parsed)
    }

    /// Validate an already-absolute URL (e.g. a resolved contact link).
    pub fn check(&self, url: &Url) -> SecurityResult<()> {
        if !self.allowed_schemes.contains(url.scheme()) {
            return Err(SecurityError::DisallowedScheme(url.scheme().to_string()));
        }

        let host = url.host().ok_or(SecurityError::NoHost)?;
        if let Some(host_str) = url.host_str() {
            if self.allowed_hosts.contains(&host_str.to_lowercase()) {
                return Ok(());
            }
        }

        let ip: Option<IpAddr> = match host {
            Host::Domain(domain) => {
                let domain = domain.trim_end_matches('.').to_lowercase();
                if domain.is_empty() {
                    return Err(SecurityError::NoHost);
                }
                if self.blocked_hosts.contains(&domain) || domain.ends_with(".localhost") {
                    return Err(SecurityError::BlockedHost(domain));
                }
                None
            }
            Host::Ipv4(v4) => Some(IpAddr::V4(v4)),
            Host::Ipv6(v6) => Some(match v6.to_ipv4_mapped() {
                Some(v4) => IpAddr::V4(v4),
                None => IpAddr::V6(v6),
            }),
        };

        if let Some(ip) = ip {
            if self.blocked_cidrs.iter().any(|cidr| cidr.contains(&ip)) {
                return Err(SecurityError::BlockedCidr(ip.to_string()));
            }
        }

        Ok(())
    }
}
