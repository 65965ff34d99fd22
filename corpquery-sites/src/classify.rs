//! Search response classification.
//!
//! Decides whether a search page is a challenge wall, an empty answer or
//! usable content before any extraction runs.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::descriptor::{CaptchaKind, SiteProfile};

/// Default pattern for a captcha image inside a challenge page.
pub static DEFAULT_CAPTCHA_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]+src=["']([^"']*(?:captcha|verify|validate)[^"']*)["']"#)
        .expect("Invalid regex")
});

/// What a search page turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// An anti-automation challenge.
    Captcha {
        /// Which marker fired.
        kind: CaptchaKind,
        /// Absolute captcha image URL, when the page shows one.
        image: Option<String>,
    },
    /// The site answered, but with nothing usable.
    Empty(String),
    /// Looks like a real result page.
    Content,
}

/// Finds the first challenge marker in `body`.
pub fn detect_captcha(profile: &SiteProfile, body: &str) -> Option<CaptchaKind> {
    let lowered = body.to_lowercase();
    profile
        .captcha_markers
        .iter()
        .find(|m| lowered.contains(&m.needle.to_lowercase()))
        .map(|m| m.kind)
}

/// Pulls the captcha image URL out of a challenge page.
pub fn captcha_image(profile: &SiteProfile, base: &Url, body: &str) -> Option<String> {
    let src = profile.captcha_image.captures(body)?.get(1)?.as_str();
    let src = src.replace("&amp;", "&");
    base.join(&src).ok().map(String::from)
}

/// Classifies a search response body.
pub fn classify(profile: &SiteProfile, base: &Url, body: &str) -> Classification {
    if let Some(kind) = detect_captcha(profile, body) {
        return Classification::Captcha {
            kind,
            image: captcha_image(profile, base, body),
        };
    }

    let lowered = body.to_lowercase();
    if let Some(marker) = profile
        .empty_markers
        .iter()
        .find(|m| lowered.contains(&m.to_lowercase()))
    {
        return Classification::Empty(format!("No company found ({marker})"));
    }

    if body.chars().count() < profile.min_body_len {
        return Classification::Empty(format!(
            "Response too short to contain company data ({} chars)",
            body.chars().count()
        ));
    }

    Classification::Content
}
