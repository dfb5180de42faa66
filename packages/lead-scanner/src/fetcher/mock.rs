//! Mock fetcher for testing.
//!
//! Provides a configurable mock implementation of the PageFetcher trait.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use url::Url;

use super::{FetchedPage, PageFetcher};
use crate::error::{FetchError, FetchResult};

#[derive(Debug, Clone)]
enum MockResponse {
    Page { html: String, final_url: Option<String> },
    Error(FetchError),
}

/// Mock fetcher for testing.
///
/// Allows configuring canned pages, errors and delays per URL. Unknown URLs
/// answer `Status 404`.
///
/// # Example
///
/// ```rust
/// use lead_scanner::fetcher::MockFetcher;
///
/// let mock = MockFetcher::new()
///     .with_page("https://example.com", "<html><body>Hello</body></html>");
/// ```
#[derive(Default, Clone)]
pub struct MockFetcher {
    /// Canned responses indexed by normalized URL
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    /// Artificial latency per URL
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    /// Track requested URLs for verification
    calls: Arc<RwLock<Vec<String>>>,
}

fn key(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

impl MockFetcher {
    /// Create a new empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    pub fn with_page(self, url: &str, html: impl Into<String>) -> Self {
        self.insert(
            url,
            MockResponse::Page {
                html: html.into(),
                final_url: None,
            },
        );
        self
    }

    /// Serve `html` for `url`, reporting `final_url` as the post-redirect URL.
    pub fn with_redirect(self, url: &str, final_url: &str, html: impl Into<String>) -> Self {
        self.insert(
            url,
            MockResponse::Page {
                html: html.into(),
                final_url: Some(final_url.to_string()),
            },
        );
        self
    }

    /// Fail requests for `url` with `error`.
    pub fn with_error(self, url: &str, error: FetchError) -> Self {
        self.insert(url, MockResponse::Error(error));
        self
    }

    /// Delay responses for `url`.
    pub fn with_delay(self, url: &str, delay: Duration) -> Self {
        self.delays.write().unwrap().insert(key(url), delay);
        self
    }

    /// Get the URLs that were requested, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Get the number of fetches issued.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    fn insert(&self, url: &str, response: MockResponse) {
        self.responses.write().unwrap().insert(key(url), response);
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult<FetchedPage> {
        let k = url.to_string();
        self.calls.write().unwrap().push(k.clone());

        let delay = self.delays.read().unwrap().get(&k).copied();
        let response = self.responses.read().unwrap().get(&k).cloned();

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match response {
            Some(MockResponse::Page { html, final_url }) => {
                let final_url = match final_url {
                    Some(f) => Url::parse(&f).map_err(|e| FetchError::Transport(e.to_string()))?,
                    None => url.clone(),
                };
                Ok(FetchedPage {
                    url: final_url,
                    body_len: html.len(),
                    html,
                })
            }
            Some(MockResponse::Error(e)) => Err(e),
            None => Err(FetchError::HttpStatus(404)),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_pages_and_records_calls() {
        let mock = MockFetcher::new().with_page("https://example.com", "<p>hi</p>");

        let page = mock
            .fetch(&Url::parse("https://example.com/").unwrap())
            .await
            .unwrap();
        assert_eq!(page.html, "<p>hi</p>");
        assert_eq!(mock.calls(), vec!["https://example.com/".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_url_is_404() {
        let mock = MockFetcher::new();
        let err = mock
            .fetch(&Url::parse("https://nowhere.example/").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::HttpStatus(404));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_redirect_reports_final_url() {
        let mock = MockFetcher::new().with_redirect(
            "http://example.com",
            "https://www.example.com/",
            "<p>hi</p>",
        );
        let page = mock
            .fetch(&Url::parse("http://example.com/").unwrap())
            .await
            .unwrap();
        assert_eq!(page.url.as_str(), "https://www.example.com/");
    }
}
