//! reqwest-backed transport with tracing and domain allowlist.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::FetchError;
use crate::transport::{FetchRequest, FetchResponse, Transport};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Browser-like User-Agent; registry sites reject obvious bots.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client used to talk to registry sites.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    timeout: Duration,
    allowed_domains: Option<Vec<String>>,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_options(Duration::from_secs(DEFAULT_TIMEOUT_SECS), BROWSER_USER_AGENT)
    }

    /// Creates a new HTTP client with a custom timeout and User-Agent.
    pub fn with_options(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: client,
            timeout,
            allowed_domains: None,
        })
    }

    /// Restricts requests to the given domains and their subdomains.
    #[must_use]
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &Url) -> Result<(), FetchError> {
        let Some(ref allowed) = self.allowed_domains else {
            return Ok(()); // No restrictions
        };

        let host = url
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl(format!("No host in URL: {url}")))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(FetchError::InvalidUrl(format!("Domain not allowed: {host}")))
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    #[instrument(skip(self, request), fields(url = %request.url))]
    async fn send(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        self.is_domain_allowed(&request.url)?;
        debug!("GET request");

        let response = self
            .inner
            .get(request.url.clone())
            .headers(request.headers.clone())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(self.timeout.as_secs())
                } else {
                    FetchError::Http(e)
                }
            })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        debug!(status = %status, bytes = body.len(), "Response received");

        Ok(FetchResponse {
            status,
            headers,
            body,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use reqwest::header::{COOKIE, SET_COOKIE};
    use wiremock::matchers::{header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn url(server: &MockServer, suffix: &str) -> Url {
        Url::parse(&format!("{}{}", server.uri(), suffix)).unwrap()
    }

    #[tokio::test]
    async fn test_sends_browser_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string("home"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let response = client.send(&FetchRequest::get(url(&server, "/"))).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "home");

        // The UA contains commas, which the `header` matcher would split.
        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].headers.get("user-agent").unwrap(), BROWSER_USER_AGENT);
    }

    #[tokio::test]
    async fn test_captures_set_cookie_and_forwards_cookie() {
        let server = MockServer::start().await;
        Mock::given(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .append_header("set-cookie", "acw_tc=abc; Path=/; HttpOnly")
                    .append_header("set-cookie", "QCCSESSID=s1; Path=/"),
            )
            .mount(&server)
            .await;
        Mock::given(path("/search"))
            .and(query_param("key", "示例"))
            .and(header("cookie", "acw_tc=abc; QCCSESSID=s1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("results"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let home = client.send(&FetchRequest::get(url(&server, "/"))).await.unwrap();
        let cookie = home.cookie_header();
        assert!(home.headers.get_all(SET_COOKIE).iter().count() == 2);

        let mut search_url = url(&server, "/search");
        search_url.query_pairs_mut().append_pair("key", "示例");
        let request = FetchRequest::get(search_url)
            .with_cookie(cookie.as_deref())
            .unwrap();
        assert!(request.headers.contains_key(COOKIE));

        let response = client.send(&request).await.unwrap();
        assert_eq!(response.body, "results");
    }

    #[tokio::test]
    async fn test_error_status_is_a_response() {
        let server = MockServer::start().await;
        Mock::given(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let response = client.send(&FetchRequest::get(url(&server, "/x"))).await.unwrap();

        assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
        assert!(!response.is_ok());
    }

    #[test]
    fn test_domain_allowlist() {
        let client = HttpClient::new()
            .unwrap()
            .with_allowed_domains(vec!["gsxt.gov.cn".to_string(), "qcc.com".to_string()]);

        let ok = |u: &str| client.is_domain_allowed(&Url::parse(u).unwrap()).is_ok();

        assert!(ok("http://www.gsxt.gov.cn/index.html"));
        assert!(ok("https://qcc.com/web/search"));
        assert!(!ok("https://evil.com/steal"));
    }

    #[test]
    fn test_no_domain_restrictions() {
        let client = HttpClient::new().unwrap();
        assert!(client
            .is_domain_allowed(&Url::parse("https://any.domain.com").unwrap())
            .is_ok());
    }
}
