//! Typed errors for the lead scanner.
//!
//! Uses `thiserror` for library errors (not `anyhow`). The `Display` text of
//! [`FetchError`] is the human-readable message recorded on a scan result, so
//! classification happens once, when the error is built.

use std::error::Error as StdError;
use std::io;

use thiserror::Error;

/// Failures on the fetch path of a scan.
///
/// None of these escape [`crate::Scanner::scan`]; they are folded into a
/// low-confidence result instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The safety gate rejected the URL
    #[error("Invalid URL")]
    InvalidUrl(#[from] SecurityError),

    /// Final response status was outside 2xx
    #[error("Status {0}")]
    HttpStatus(u16),

    /// Body exceeded the configured cap
    #[error("Page too large")]
    PageTooLarge,

    /// The scan deadline fired before the fetch finished
    #[error("Scan timed out ({secs}s)")]
    Timeout { secs: u64 },

    /// Host name does not resolve
    #[error("Domain not found (DNS error)")]
    DnsFailure,

    /// Resolver failed transiently
    #[error("DNS Lookup failed")]
    DnsRetry,

    #[error("Connection refused")]
    ConnectionRefused,

    /// Transport-level connect/read timeout (not the scan deadline)
    #[error("Connection timed out")]
    ConnectionTimeout,

    /// Anything else; carries the underlying error text
    #[error("{0}")]
    Transport(String),
}

impl FetchError {
    /// Classify a reqwest failure into the closed set of fetch errors.
    ///
    /// Walks the source chain looking for an `io::Error` kind, then checks the
    /// joined chain text for resolver messages; falls back to the outermost
    /// error text.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        let mut chain = Vec::new();
        let mut source: Option<&(dyn StdError + 'static)> = Some(err);
        while let Some(current) = source {
            if let Some(io_err) = current.downcast_ref::<io::Error>() {
                match io_err.kind() {
                    io::ErrorKind::ConnectionRefused => return Self::ConnectionRefused,
                    io::ErrorKind::TimedOut => return Self::ConnectionTimeout,
                    _ => {}
                }
            }
            chain.push(current.to_string());
            source = current.source();
        }

        if let Some(dns) = classify_resolver_message(&chain.join(": ")) {
            return dns;
        }

        if err.is_timeout() {
            return Self::ConnectionTimeout;
        }

        Self::Transport(err.to_string())
    }
}

/// Map resolver error text onto the DNS variants.
///
/// getaddrinfo reports `EAI_AGAIN` as "Temporary failure in name resolution"
/// (glibc) or "try again" (musl/macOS). "try again" only counts inside a
/// resolver error; any other resolver error is a hard lookup failure.
fn classify_resolver_message(message: &str) -> Option<FetchError> {
    let lower = message.to_lowercase();
    let resolver = lower.contains("dns error")
        || lower.contains("failed to lookup address")
        || lower.contains("name or service not known")
        || lower.contains("no such host")
        || lower.contains("nodename nor servname");

    if lower.contains("temporary failure in name resolution")
        || (resolver && lower.contains("try again"))
    {
        return Some(FetchError::DnsRetry);
    }
    resolver.then_some(FetchError::DnsFailure)
}

/// Safety gate rejections (SSRF deterrent).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityError {
    /// URL scheme not allowed (e.g., file://, ftp://)
    #[error("disallowed URL scheme: {0}")]
    DisallowedScheme(String),

    /// Host is blocked (e.g., localhost)
    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// IP in blocked CIDR range (e.g., 10.0.0.0/8)
    #[error("blocked IP range: {0}")]
    BlockedCidr(String),

    /// URL has no host
    #[error("URL has no host")]
    NoHost,

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for security operations.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;
