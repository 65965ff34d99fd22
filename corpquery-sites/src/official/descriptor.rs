//! Registry site profile.

use url::Url;

use super::parser::registry_extractors;
use crate::descriptor::{CaptchaKind, CaptchaMarker, SiteKind, SiteProfile};

/// Default root of the registry site.
pub const REGISTRY_BASE_URL: &str = "http://www.gsxt.gov.cn/";

const CAPTCHA_MARKERS: &[CaptchaMarker] = &[
    CaptchaMarker::new("验证码", CaptchaKind::Image),
    CaptchaMarker::new("滑动验证", CaptchaKind::Slider),
    CaptchaMarker::new("slider", CaptchaKind::Slider),
    CaptchaMarker::new("安全验证", CaptchaKind::Verification),
    CaptchaMarker::new("verification", CaptchaKind::Verification),
    CaptchaMarker::new("validate", CaptchaKind::Verification),
];

/// Builds the registry profile rooted at `base_url`.
pub fn registry_profile(base_url: Url) -> SiteProfile {
    let mut builder = SiteProfile::builder(SiteKind::Registry, base_url)
        .display_name("National Enterprise Credit Information System")
        .search("/corp-query-entprise-info-xx.html", "key")
        .init_session(false)
        .captcha_markers(CAPTCHA_MARKERS)
        .min_body_len(0)
        .require_name(true);

    for extractor in registry_extractors() {
        builder = builder.extractor(extractor);
    }

    builder.build()
}
