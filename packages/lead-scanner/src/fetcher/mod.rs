//! Page fetching.
//!
//! - `PageFetcher` - the seam the scanner fetches through
//! - `HttpFetcher` - reqwest implementation with streaming size cap
//! - `MockFetcher` - canned responses for tests
//!
//! The deadline is applied by [`fetch_bounded`], not by the implementations,
//! so every fetcher gets the same cancellation behaviour.

mod http;
mod mock;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::types::config::ScanConfig;

pub use http::HttpFetcher;
pub use mock::MockFetcher;

/// A successfully fetched HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: Url,

    /// Decoded body
    pub html: String,

    /// Bytes received on the wire, before decoding
    pub body_len: usize,
}

/// Fetches a single page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Issue one GET for `url`, following redirects.
    async fn fetch(&self, url: &Url) -> FetchResult<FetchedPage>;

    /// Get the fetcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

/// Fetch under the configured deadline and size cap.
///
/// On timeout the in-flight fetch future is dropped, which aborts the
/// transfer and releases its connection.
pub async fn fetch_bounded<F>(fetcher: &F, url: &Url, config: &ScanConfig) -> FetchResult<FetchedPage>
where
    F: PageFetcher + ?Sized,
{
    debug!(url = %url, fetcher = fetcher.name(), "fetch starting");

    let page = tokio::time::timeout(config.timeout(), fetcher.fetch(url))
        .await
        .map_err(|_| FetchError::Timeout {
            secs: config.timeout_secs,
        })??;

    if page.body_len > config.max_body_bytes {
        return Err(FetchError::PageTooLarge);
    }

    debug!(
        url = %url,
        final_url = %page.url,
        bytes = page.body_len,
        "fetch finished"
    );
    Ok(page)
}
