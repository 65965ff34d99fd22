//! Aggregator site profile.

use url::Url;

use super::parser::{DETAIL_LINK_RE, aggregator_extractors};
use crate::descriptor::{CaptchaKind, CaptchaMarker, SiteKind, SiteProfile};

/// Default root of the aggregator site.
pub const AGGREGATOR_BASE_URL: &str = "https://www.qcc.com/";

const CAPTCHA_MARKERS: &[CaptchaMarker] = &[
    CaptchaMarker::new("验证码", CaptchaKind::Image),
    CaptchaMarker::new("captcha", CaptchaKind::Image),
    CaptchaMarker::new("滑动验证", CaptchaKind::Slider),
    CaptchaMarker::new("滑块", CaptchaKind::Slider),
    CaptchaMarker::new("slider", CaptchaKind::Slider),
    CaptchaMarker::new("安全验证", CaptchaKind::Verification),
    CaptchaMarker::new("verification", CaptchaKind::Verification),
    CaptchaMarker::new("validate", CaptchaKind::Verification),
];

const EMPTY_MARKERS: &[&str] = &[
    "no result",
    "noresult",
    "未找到",
    "没有找到",
    "页面出错",
    "error-page",
];

/// Builds the aggregator profile rooted at `base_url`.
pub fn aggregator_profile(base_url: Url) -> SiteProfile {
    let mut builder = SiteProfile::builder(SiteKind::Aggregator, base_url)
        .display_name("Company information aggregator")
        .search("/web/search", "key")
        .init_session(true)
        .captcha_markers(CAPTCHA_MARKERS)
        .empty_markers(EMPTY_MARKERS)
        .detail_link(DETAIL_LINK_RE.clone());

    for extractor in aggregator_extractors() {
        builder = builder.extractor(extractor);
    }

    builder.build()
}
