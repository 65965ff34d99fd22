//! Site profile system.
//!
//! A profile holds everything the scraper needs to know about one site:
//! - URLs (base, search path, query parameter)
//! - Anti-automation and "no data" markers
//! - Where the detail page link lives, if the site has one
//! - One field extractor per record field

use corpquery_core::{FieldExtractor, RecordField};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::SiteError;

/// Search bodies shorter than this are treated as "no data".
pub const DEFAULT_MIN_BODY_LEN: usize = 1000;

// ============================================================================
// Site Kind
// ============================================================================

/// The built-in sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SiteKind {
    /// The official registry site.
    Registry,
    /// A third-party aggregator republishing registry data.
    #[default]
    Aggregator,
}

impl SiteKind {
    /// Returns all site kinds.
    pub fn all() -> &'static [SiteKind] {
        &[Self::Registry, Self::Aggregator]
    }

    /// Name used in configuration and on the command line.
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::Registry => "registry",
            Self::Aggregator => "aggregator",
        }
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cli_name())
    }
}

impl FromStr for SiteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|k| k.cli_name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown site '{s}' (expected registry or aggregator)"))
    }
}

// ============================================================================
// Captcha Markers
// ============================================================================

/// The kind of anti-automation challenge a marker signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptchaKind {
    /// Classic image captcha.
    Image,
    /// Drag-the-slider challenge.
    Slider,
    /// Any other verification wall.
    Verification,
}

impl CaptchaKind {
    /// Message returned to API callers.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Image => "Captcha required: solve the image challenge and retry",
            Self::Slider => "Slider verification required by the registry site",
            Self::Verification => "Verification required by the registry site",
        }
    }
}

/// A body substring that signals a challenge. Matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptchaMarker {
    /// Substring to look for.
    pub needle: &'static str,
    /// What the marker means.
    pub kind: CaptchaKind,
}

impl CaptchaMarker {
    /// Creates a marker.
    pub const fn new(needle: &'static str, kind: CaptchaKind) -> Self {
        Self { needle, kind }
    }
}

// ============================================================================
// Site Profile
// ============================================================================

/// Complete description of one scrape target.
pub struct SiteProfile {
    /// Which built-in site this is.
    pub kind: SiteKind,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Site root; also the session-init URL.
    pub base_url: Url,
    /// Path of the search page, relative to the base.
    pub search_path: &'static str,
    /// Query parameter carrying the company name.
    pub search_param: &'static str,
    /// Whether to visit the root first to obtain a session cookie.
    pub init_session: bool,
    /// Challenge markers, checked in order.
    pub captcha_markers: Vec<CaptchaMarker>,
    /// "No data" markers.
    pub empty_markers: Vec<&'static str>,
    /// Minimum search body length for a usable answer.
    pub min_body_len: usize,
    /// Locates a captcha image URL in a challenge page.
    pub captcha_image: Regex,
    /// Locates the detail page link; `None` when results are inline.
    pub detail_link: Option<Regex>,
    /// One extractor per field.
    pub extractors: Vec<Box<dyn FieldExtractor>>,
    /// Whether a page without a company name means "not found".
    pub require_name: bool,
}

impl SiteProfile {
    /// Creates a new profile builder.
    pub fn builder(kind: SiteKind, base_url: Url) -> SiteProfileBuilder {
        SiteProfileBuilder::new(kind, base_url)
    }

    /// Builds the search URL for a company name.
    pub fn search_url(&self, name: &str) -> Result<Url, SiteError> {
        let mut url = self.base_url.join(self.search_path)?;
        url.query_pairs_mut().append_pair(self.search_param, name);
        Ok(url)
    }

    /// Resolves a (possibly relative) detail link against the base URL.
    pub fn detail_url(&self, href: &str) -> Result<Url, SiteError> {
        Ok(self.base_url.join(href)?)
    }

    /// Host to allow-list for this profile, without a leading `www.`.
    pub fn allowed_domain(&self) -> Option<String> {
        let host = self.base_url.host_str()?;
        Some(host.strip_prefix("www.").unwrap_or(host).to_string())
    }

    /// Runs the extractor for `field`, if the profile has one.
    pub fn extract(&self, field: RecordField, html: &str) -> Option<String> {
        self.extractors
            .iter()
            .find(|e| e.field() == field)
            .and_then(|e| e.extract(html))
    }
}

impl fmt::Debug for SiteProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteProfile")
            .field("kind", &self.kind)
            .field("base_url", &self.base_url.as_str())
            .field("search_path", &self.search_path)
            .field("init_session", &self.init_session)
            .field("extractors", &self.extractors.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`SiteProfile`].
pub struct SiteProfileBuilder {
    kind: SiteKind,
    display_name: &'static str,
    base_url: Url,
    search_path: &'static str,
    search_param: &'static str,
    init_session: bool,
    captcha_markers: Vec<CaptchaMarker>,
    empty_markers: Vec<&'static str>,
    min_body_len: usize,
    captcha_image: Option<Regex>,
    detail_link: Option<Regex>,
    extractors: Vec<Box<dyn FieldExtractor>>,
    require_name: bool,
}

impl SiteProfileBuilder {
    /// Creates a new builder for the given site.
    pub fn new(kind: SiteKind, base_url: Url) -> Self {
        Self {
            kind,
            display_name: kind.cli_name(),
            base_url,
            search_path: "/",
            search_param: "key",
            init_session: true,
            captcha_markers: Vec::new(),
            empty_markers: Vec::new(),
            min_body_len: DEFAULT_MIN_BODY_LEN,
            captcha_image: None,
            detail_link: None,
            extractors: Vec::new(),
            require_name: false,
        }
    }

    /// Sets the display name.
    pub fn display_name(mut self, name: &'static str) -> Self {
        self.display_name = name;
        self
    }

    /// Sets the search path and query parameter.
    pub fn search(mut self, path: &'static str, param: &'static str) -> Self {
        self.search_path = path;
        self.search_param = param;
        self
    }

    /// Enables or disables the session-init request.
    pub fn init_session(mut self, enabled: bool) -> Self {
        self.init_session = enabled;
        self
    }

    /// Sets the challenge markers.
    pub fn captcha_markers(mut self, markers: &[CaptchaMarker]) -> Self {
        self.captcha_markers = markers.to_vec();
        self
    }

    /// Sets the "no data" markers.
    pub fn empty_markers(mut self, markers: &[&'static str]) -> Self {
        self.empty_markers = markers.to_vec();
        self
    }

    /// Sets the minimum usable body length.
    pub fn min_body_len(mut self, len: usize) -> Self {
        self.min_body_len = len;
        self
    }

    /// Sets the captcha image pattern.
    pub fn captcha_image(mut self, pattern: Regex) -> Self {
        self.captcha_image = Some(pattern);
        self
    }

    /// Sets the detail link pattern.
    pub fn detail_link(mut self, pattern: Regex) -> Self {
        self.detail_link = Some(pattern);
        self
    }

    /// Adds a field extractor, replacing any earlier one for the same field.
    pub fn extractor(mut self, extractor: impl FieldExtractor + 'static) -> Self {
        self.extractors.retain(|e| e.field() != extractor.field());
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Requires the name extractor to match.
    pub fn require_name(mut self, required: bool) -> Self {
        self.require_name = required;
        self
    }

    /// Builds the profile.
    pub fn build(self) -> SiteProfile {
        SiteProfile {
            kind: self.kind,
            display_name: self.display_name,
            base_url: self.base_url,
            search_path: self.search_path,
            search_param: self.search_param,
            init_session: self.init_session,
            captcha_markers: self.captcha_markers,
            empty_markers: self.empty_markers,
            min_body_len: self.min_body_len,
            captcha_image: self
                .captcha_image
                .unwrap_or_else(|| crate::classify::DEFAULT_CAPTCHA_IMAGE_RE.clone()),
            detail_link: self.detail_link,
            extractors: self.extractors,
            require_name: self.require_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::RegexExtractor;

    fn base() -> Url {
        Url::parse("https://www.example-registry.test/").unwrap()
    }

    #[test]
    fn test_site_kind_parse() {
        assert_eq!("registry".parse::<SiteKind>().unwrap(), SiteKind::Registry);
        assert_eq!("Aggregator".parse::<SiteKind>().unwrap(), SiteKind::Aggregator);
        assert!("other".parse::<SiteKind>().is_err());
        assert_eq!(SiteKind::default(), SiteKind::Aggregator);
    }

    #[test]
    fn test_search_url_encodes_name() {
        let profile = SiteProfile::builder(SiteKind::Aggregator, base())
            .search("/web/search", "key")
            .build();

        let url = profile.search_url("北京 A&B").unwrap();
        assert_eq!(url.path(), "/web/search");
        let pairs: Vec<_> = url.query_pairs().collect();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "key");
        assert_eq!(pairs[0].1, "北京 A&B");
    }

    #[test]
    fn test_detail_url_resolution() {
        let profile = SiteProfile::builder(SiteKind::Aggregator, base()).build();

        assert_eq!(
            profile.detail_url("/firm/abc.html").unwrap().as_str(),
            "https://www.example-registry.test/firm/abc.html"
        );
        assert_eq!(
            profile.detail_url("https://other.test/firm/x.html").unwrap().as_str(),
            "https://other.test/firm/x.html"
        );
    }

    #[test]
    fn test_allowed_domain_strips_www() {
        let profile = SiteProfile::builder(SiteKind::Registry, base()).build();
        assert_eq!(profile.allowed_domain().as_deref(), Some("example-registry.test"));
    }

    #[test]
    fn test_extractor_replaces_same_field() {
        let profile = SiteProfile::builder(SiteKind::Registry, base())
            .extractor(RegexExtractor::from_pattern(RecordField::Name, r"<b>(.+?)</b>").unwrap())
            .extractor(RegexExtractor::from_pattern(RecordField::Name, r"<i>(.+?)</i>").unwrap())
            .build();

        assert_eq!(profile.extractors.len(), 1);
        assert_eq!(
            profile.extract(RecordField::Name, "<b>old</b><i>new</i>").as_deref(),
            Some("new")
        );
        assert_eq!(profile.extract(RecordField::Capital, "<b>x</b>"), None);
    }
}
