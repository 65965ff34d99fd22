//! The company scraper.
//!
//! One call to [`Scraper::fetch_company_info`] runs the whole sequence for
//! a single company name:
//!
//! 1. Visit the site root for a session cookie (if the profile asks for it)
//! 2. Search by name
//! 3. Classify the search page (challenge, empty, content)
//! 4. Follow the detail link (if the profile has one)
//! 5. Extract the fields, persist the record
//!
//! Failures never escape: every error becomes a captcha-required outcome
//! carrying the error message.

use chrono::Utc;
use corpquery_core::{CaptchaOrErrorResult, CompanyRecord, RecordField, ScrapeOutcome};
use corpquery_fetch::{
    FetchError, FetchRequest, FetchResponse, RetryStrategy, Transport, fetch_with_retry,
};
use corpquery_store::{RecordStore, save_record};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::classify::{Classification, captcha_image, classify, detect_captcha};
use crate::descriptor::SiteProfile;
use crate::error::SiteError;

/// Scrapes one site profile and persists what it finds.
pub struct Scraper {
    profile: SiteProfile,
    transport: Arc<dyn Transport>,
    store: Arc<dyn RecordStore>,
    retry: RetryStrategy,
}

impl Scraper {
    /// Creates a scraper with the default retry strategy.
    pub fn new(
        profile: SiteProfile,
        transport: Arc<dyn Transport>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            profile,
            transport,
            store,
            retry: RetryStrategy::default(),
        }
    }

    /// Replaces the retry strategy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryStrategy) -> Self {
        self.retry = retry;
        self
    }

    /// The profile being scraped.
    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    /// Looks up one company.
    ///
    /// `captcha` is the caller's answer to an earlier challenge. It is only
    /// logged; the sites offer no documented way to submit it.
    #[instrument(skip(self, captcha), fields(site = %self.profile.kind))]
    pub async fn fetch_company_info(&self, name: &str, captcha: Option<&str>) -> ScrapeOutcome {
        if let Some(answer) = captcha {
            debug!(captcha = %answer, "Captcha answer supplied, not submitted");
        }

        match self.scrape(name).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Scrape failed");
                ScrapeOutcome::Blocked(error_result(&e))
            }
        }
    }

    async fn scrape(&self, name: &str) -> Result<ScrapeOutcome, SiteError> {
        let cookie = self.init_session().await?;

        let search_url = self.profile.search_url(name)?;
        let search = self.get(search_url.clone(), cookie.as_deref()).await?;

        match classify(&self.profile, &search_url, &search.body) {
            Classification::Captcha { kind, image } => {
                warn!(?kind, has_image = image.is_some(), "Search page is a challenge");
                return Ok(CaptchaOrErrorResult::captcha(kind.message())
                    .with_image(image)
                    .into());
            }
            Classification::Empty(message) => {
                debug!(%message, "Search returned no data");
                return Ok(CaptchaOrErrorResult::no_data(message).into());
            }
            Classification::Content => {}
        }

        let detail_body = match &self.profile.detail_link {
            Some(pattern) => {
                let Some(href) = pattern.captures(&search.body).and_then(|c| c.get(1)) else {
                    debug!("No detail link on search page");
                    return Ok(CaptchaOrErrorResult::no_data("No company detail link found").into());
                };
                let detail_url = self.profile.detail_url(href.as_str())?;
                let detail = self.get(detail_url.clone(), cookie.as_deref()).await?;

                if let Some(kind) = detect_captcha(&self.profile, &detail.body) {
                    warn!(?kind, "Detail page is a challenge");
                    let image = captcha_image(&self.profile, &detail_url, &detail.body);
                    return Ok(CaptchaOrErrorResult::captcha(kind.message())
                        .with_image(image)
                        .into());
                }
                detail.body
            }
            None => search.body,
        };

        if self.profile.require_name && self.profile.extract(RecordField::Name, &detail_body).is_none()
        {
            debug!("No company name on result page");
            return Ok(ScrapeOutcome::NotFound);
        }

        let record = CompanyRecord::from_fields(
            name,
            |field| self.profile.extract(field, &detail_body),
            Utc::now(),
        );
        let key = save_record(self.store.as_ref(), &record).await?;
        info!(key = %key, company = %record.name, "Stored company record");

        Ok(ScrapeOutcome::Found(record))
    }

    async fn init_session(&self) -> Result<Option<String>, SiteError> {
        if !self.profile.init_session {
            return Ok(None);
        }

        let response = self.get(self.profile.base_url.clone(), None).await?;
        let cookie = response.cookie_header();
        debug!(has_cookie = cookie.is_some(), "Session initialized");
        Ok(cookie)
    }

    async fn get(&self, url: Url, cookie: Option<&str>) -> Result<FetchResponse, SiteError> {
        let request = FetchRequest::get(url).with_cookie(cookie)?;
        Ok(fetch_with_retry(self.transport.as_ref(), &request, &self.retry).await?)
    }
}

fn error_result(error: &SiteError) -> CaptchaOrErrorResult {
    match error {
        SiteError::Fetch(FetchError::Status { status, .. }) => {
            CaptchaOrErrorResult::captcha(format!("HTTP {status}"))
        }
        other => CaptchaOrErrorResult::captcha(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpquery_core::UNKNOWN;
    use corpquery_fetch::testing::MockTransport;
    use corpquery_store::{MemoryStore, recent_history};
    use reqwest::header::SET_COOKIE;
    use std::time::Duration;

    use crate::descriptor::SiteKind;
    use crate::registry::SiteRegistry;

    const BASE: &str = "https://agg.test/";
    // Host-qualified so it outranks the root route.
    const SEARCH: &str = "agg.test/web/search";

    fn filler() -> String {
        format!("<div class=\"nav\">{}</div>", "<span>menu</span>".repeat(80))
    }

    fn search_page(link: &str) -> String {
        format!(
            r#"<html><body>{}<a class="title" href="{link}">Acme</a></body></html>"#,
            filler()
        )
    }

    fn detail_page() -> String {
        format!(
            r#"<html><body>{}<h1>Acme Trading Co</h1>
<table><tr><td>统一社会信用代码</td><td>91110000ABCDEF1234</td>
<td>法定代表人</td><td><a href="/pl/1.html">张三</a></td></tr>
<tr><td>注册资本</td><td>100万元</td><td>成立日期</td><td>2010-05-20</td></tr></table>
</body></html>"#,
            filler()
        )
    }

    fn aggregator(transport: &Arc<MockTransport>, store: &Arc<MemoryStore>) -> Scraper {
        let profile = SiteRegistry::profile_with_base(SiteKind::Aggregator, Some(BASE)).unwrap();
        Scraper::new(profile, transport.clone(), store.clone())
            .with_retry(RetryStrategy::new(2).with_delay(Duration::ZERO))
    }

    #[tokio::test]
    async fn test_full_aggregator_flow() {
        let transport = Arc::new(
            MockTransport::new()
                .respond_with_header(BASE, 200, "<html></html>", (SET_COOKIE, "sid=abc; Path=/"))
                .respond(SEARCH, 200, search_page("/firm/acme.html"))
                .respond("agg.test/firm/acme.html", 200, detail_page()),
        );
        let store = Arc::new(MemoryStore::new());
        let scraper = aggregator(&transport, &store);

        let outcome = scraper.fetch_company_info("Acme", None).await;
        let record = outcome.record().expect("record").clone();

        assert_eq!(record.name, "Acme Trading Co");
        assert_eq!(record.reg_number, "91110000ABCDEF1234");
        assert_eq!(record.legal_rep, "张三");
        assert_eq!(record.capital, "100万元");
        assert_eq!(record.established, "2010-05-20");

        // Session cookie is forwarded to search and detail requests.
        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].headers.get("cookie").is_none());
        for request in &requests[1..] {
            assert_eq!(request.headers.get("cookie").unwrap(), "sid=abc");
        }

        let history = recent_history(store.as_ref(), 50).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].reg_number, record.reg_number);
    }

    #[tokio::test]
    async fn test_missing_fields_fall_back() {
        let detail = format!("<html>{}<p>nothing useful</p></html>", filler());
        let transport = Arc::new(
            MockTransport::new()
                .respond(BASE, 200, "")
                .respond(SEARCH, 200, search_page("/firm/x.html"))
                .respond("agg.test/firm/x.html", 200, detail),
        );
        let store = Arc::new(MemoryStore::new());

        let outcome = aggregator(&transport, &store).fetch_company_info("Query Name", None).await;
        let record = outcome.record().unwrap();

        assert_eq!(record.name, "Query Name");
        assert_eq!(record.reg_number, UNKNOWN);
        assert_eq!(record.established, UNKNOWN);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_search_captcha_stops_before_detail() {
        let body = format!(
            r#"{}<p>请完成滑动验证</p><img src="/captcha/img.png">"#,
            filler()
        );
        let transport = Arc::new(
            MockTransport::new()
                .respond(BASE, 200, "")
                .respond(SEARCH, 200, body),
        );
        let store = Arc::new(MemoryStore::new());

        let outcome = aggregator(&transport, &store).fetch_company_info("Acme", None).await;

        let ScrapeOutcome::Blocked(result) = outcome else {
            panic!("expected blocked outcome");
        };
        assert!(result.captcha_required);
        assert_eq!(
            result.captcha_image.as_deref(),
            Some("https://agg.test/captcha/img.png")
        );
        assert_eq!(transport.calls_matching("/firm/"), 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_short_search_body_is_soft_failure() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(BASE, 200, "")
                .respond(SEARCH, 200, "<html>tiny</html>"),
        );
        let store = Arc::new(MemoryStore::new());

        let outcome = aggregator(&transport, &store).fetch_company_info("Acme", None).await;

        let ScrapeOutcome::Blocked(result) = outcome else {
            panic!("expected blocked outcome");
        };
        assert!(!result.captcha_required);
        assert!(result.message.is_some());
    }

    #[tokio::test]
    async fn test_missing_detail_link_is_soft_failure() {
        let body = format!("<html>{}</html>", filler());
        let transport = Arc::new(
            MockTransport::new()
                .respond(BASE, 200, "")
                .respond(SEARCH, 200, body),
        );
        let store = Arc::new(MemoryStore::new());

        let outcome = aggregator(&transport, &store).fetch_company_info("Acme", None).await;

        assert_eq!(
            outcome,
            ScrapeOutcome::Blocked(CaptchaOrErrorResult::no_data("No company detail link found"))
        );
    }

    #[tokio::test]
    async fn test_detail_captcha() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(BASE, 200, "")
                .respond(SEARCH, 200, search_page("/firm/a.html"))
                .respond("agg.test/firm/a.html", 200, "<p>安全验证</p>"),
        );
        let store = Arc::new(MemoryStore::new());

        let outcome = aggregator(&transport, &store).fetch_company_info("Acme", None).await;

        assert!(matches!(outcome, ScrapeOutcome::Blocked(r) if r.captcha_required));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_http_status_becomes_captcha_after_retries() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(BASE, 200, "")
                .respond(SEARCH, 503, "busy"),
        );
        let store = Arc::new(MemoryStore::new());

        let outcome = aggregator(&transport, &store).fetch_company_info("Acme", None).await;

        let ScrapeOutcome::Blocked(result) = outcome else {
            panic!("expected blocked outcome");
        };
        assert!(result.captcha_required);
        assert_eq!(result.message.as_deref(), Some("HTTP 503 Service Unavailable"));
        assert_eq!(transport.calls_matching("/web/search"), 3);
    }

    #[tokio::test]
    async fn test_transport_error_becomes_captcha() {
        let transport = Arc::new(MockTransport::new().fail(BASE, "connection reset"));
        let store = Arc::new(MemoryStore::new());

        let outcome = aggregator(&transport, &store).fetch_company_info("Acme", None).await;

        let ScrapeOutcome::Blocked(result) = outcome else {
            panic!("expected blocked outcome");
        };
        assert!(result.captcha_required);
        assert!(result.message.unwrap().contains("connection reset"));
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_registry_inline_result() {
        let base = "http://registry.test/";
        let page = r#"<h1 class="company-name">深圳市某某科技有限公司</h1>
<span>统一社会信用代码：91440300MA5ABCDE12</span><span>法定代表人：王五</span>"#;
        let transport = Arc::new(MockTransport::new().respond("corp-query", 200, page));
        let store = Arc::new(MemoryStore::new());
        let profile = SiteRegistry::profile_with_base(SiteKind::Registry, Some(base)).unwrap();
        let scraper = Scraper::new(profile, transport.clone(), store.clone())
            .with_retry(RetryStrategy::no_retry());

        let outcome = scraper.fetch_company_info("某某科技", Some("x7k2")).await;
        let record = outcome.record().unwrap();

        assert_eq!(record.name, "深圳市某某科技有限公司");
        assert_eq!(record.reg_number, "91440300MA5ABCDE12");
        assert_eq!(record.capital, UNKNOWN);
        // No session request, no detail request.
        assert_eq!(transport.calls(), 1);
        // The captcha answer is never sent to the site.
        assert!(!transport.requests()[0].url.as_str().contains("x7k2"));
    }

    #[tokio::test]
    async fn test_registry_without_name_is_not_found() {
        let transport = Arc::new(MockTransport::new().respond("corp-query", 200, "<p>暂无数据</p>"));
        let store = Arc::new(MemoryStore::new());
        let profile =
            SiteRegistry::profile_with_base(SiteKind::Registry, Some("http://registry.test/")).unwrap();
        let scraper = Scraper::new(profile, transport, store.clone());

        let outcome = scraper.fetch_company_info("nobody", None).await;

        assert_eq!(outcome, ScrapeOutcome::NotFound);
        assert!(store.is_empty().await);
    }
}
