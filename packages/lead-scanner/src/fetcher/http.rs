//! HTTP fetcher built on reqwest.

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::redirect;
use tracing::{debug, warn};
use url::Url;

use super::{FetchedPage, PageFetcher};
use crate::error::{FetchError, FetchResult};
use crate::security::UrlGate;
use crate::types::config::ScanConfig;

const MAX_REDIRECTS: usize = 10;

/// Fetches pages over HTTP(S) with a fixed user agent and a body size cap.
///
/// Redirect hops are re-checked against the [`UrlGate`] so a public site
/// cannot bounce the scanner onto a private address.
///
/// # Example
///
/// ```rust,ignore
/// let fetcher = HttpFetcher::new(&ScanConfig::default())?;
/// let page = fetch_bounded(&fetcher, &url, &config).await?;
/// ```
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Create a fetcher whose redirects are checked by the default gate.
    pub fn new(config: &ScanConfig) -> FetchResult<Self> {
        Self::with_gate(config, UrlGate::new())
    }

    /// Create a fetcher whose redirects are checked by `gate`.
    pub fn with_gate(config: &ScanConfig, gate: UrlGate) -> FetchResult<Self> {
        let policy = redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                attempt.error("too many redirects")
            } else if let Err(e) = gate.check(attempt.url()) {
                attempt.error(e)
            } else {
                attempt.follow()
            }
        });

        let client = reqwest::Client::builder()
            .redirect(policy)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Read the body chunk by chunk, aborting once the cap is exceeded.
    async fn read_capped(&self, mut response: reqwest::Response) -> FetchResult<Vec<u8>> {
        if let Some(len) = response.content_length() {
            if len > self.max_body_bytes as u64 {
                return Err(FetchError::PageTooLarge);
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::from_reqwest(&e))?
        {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(FetchError::PageTooLarge);
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult<FetchedPage> {
        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                let classified = FetchError::from_reqwest(&e);
                warn!(url = %url, error = %e, classified = %classified, "HTTP request failed");
                classified
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(url = %url, status = status.as_u16(), "non-success status");
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        // Capture final URL after redirects
        let final_url = response.url().clone();
        let body = self.read_capped(response).await?;

        Ok(FetchedPage {
            url: final_url,
            html: String::from_utf8_lossy(&body).into_owned(),
            body_len: body.len(),
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::fetch_bounded;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn loopback_fetcher(config: &ScanConfig) -> HttpFetcher {
        HttpFetcher::with_gate(config, UrlGate::new().allow_host("127.0.0.1")).unwrap()
    }

    fn server_url(server: &MockServer, p: &str) -> Url {
        Url::parse(&format!("{}{}", server.uri(), p)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_html_and_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", crate::types::config::DEFAULT_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let fetcher = loopback_fetcher(&ScanConfig::default());
        let page = fetcher.fetch(&server_url(&server, "/")).await.unwrap();

        assert_eq!(page.html, "<html>ok</html>");
        assert_eq!(page.body_len, 15);
    }

    #[tokio::test]
    async fn test_fetch_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = loopback_fetcher(&ScanConfig::default());
        let err = fetcher.fetch(&server_url(&server, "/gone")).await.unwrap_err();

        assert_eq!(err, FetchError::HttpStatus(404));
        assert_eq!(err.to_string(), "Status 404");
    }

    #[tokio::test]
    async fn test_fetch_rejects_oversized_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/big"))
            .respond_with(ResponseTemplate::new(200).set_body_string("a".repeat(2048)))
            .mount(&server)
            .await;

        let config = ScanConfig::default().with_max_body_bytes(1024);
        let fetcher = loopback_fetcher(&config);
        let err = fetcher.fetch(&server_url(&server, "/big")).await.unwrap_err();

        assert_eq!(err, FetchError::PageTooLarge);
    }

    #[tokio::test]
    async fn test_cap_counts_received_bytes_not_decoded_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latin1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xE9; 8]))
            .mount(&server)
            .await;

        let config = ScanConfig::default().with_max_body_bytes(10);
        let fetcher = loopback_fetcher(&config);
        let page = fetch_bounded(&fetcher, &server_url(&server, "/latin1"), &config)
            .await
            .unwrap();

        assert_eq!(page.body_len, 8);
        // Each invalid byte decodes to a 3-byte replacement character
        assert_eq!(page.html.len(), 24);
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects_and_reports_final_url() {
        let server = MockServer::start().await;
        let target = format!("{}/home", server.uri());
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", target.as_str()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/home"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>home</p>"))
            .mount(&server)
            .await;

        let fetcher = loopback_fetcher(&ScanConfig::default());
        let page = fetcher.fetch(&server_url(&server, "/")).await.unwrap();

        assert_eq!(page.url.path(), "/home");
        assert_eq!(page.html, "<p>home</p>");
    }

    #[tokio::test]
    async fn test_redirect_into_blocked_range_is_refused() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("location", "http://10.0.0.1/admin"),
            )
            .mount(&server)
            .await;

        let fetcher = loopback_fetcher(&ScanConfig::default());
        let err = fetcher.fetch(&server_url(&server, "/")).await.unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_classified() {
        // Bind then drop a listener to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let fetcher = loopback_fetcher(&ScanConfig::default());
        let url = Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();

        assert_eq!(err, FetchError::ConnectionRefused);
    }
}
