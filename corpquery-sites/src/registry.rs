//! Site registry for looking up built-in profiles.

use url::Url;

use crate::aggregator::{AGGREGATOR_BASE_URL, aggregator_profile};
use crate::descriptor::{SiteKind, SiteProfile};
use crate::error::SiteError;
use crate::official::{REGISTRY_BASE_URL, registry_profile};

/// Central lookup for site profiles.
pub struct SiteRegistry;

impl SiteRegistry {
    /// Returns the default base URL for a site.
    pub fn default_base_url(kind: SiteKind) -> &'static str {
        match kind {
            SiteKind::Registry => REGISTRY_BASE_URL,
            SiteKind::Aggregator => AGGREGATOR_BASE_URL,
        }
    }

    /// Returns the profile for a site at its default address.
    pub fn profile(kind: SiteKind) -> Result<SiteProfile, SiteError> {
        Self::profile_with_base(kind, None)
    }

    /// Returns the profile for a site, optionally re-rooted at `base_url`.
    ///
    /// Used for mirrors and for pointing the scraper at a local test server.
    pub fn profile_with_base(
        kind: SiteKind,
        base_url: Option<&str>,
    ) -> Result<SiteProfile, SiteError> {
        let base = Url::parse(base_url.unwrap_or_else(|| Self::default_base_url(kind)))?;
        Ok(match kind {
            SiteKind::Registry => registry_profile(base),
            SiteKind::Aggregator => aggregator_profile(base),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_profile() {
        for kind in SiteKind::all() {
            let profile = SiteRegistry::profile(*kind).unwrap();
            assert_eq!(profile.kind, *kind);
            assert_eq!(profile.base_url.as_str(), SiteRegistry::default_base_url(*kind));
        }
    }

    #[test]
    fn test_custom_base_url() {
        let profile =
            SiteRegistry::profile_with_base(SiteKind::Aggregator, Some("http://127.0.0.1:4000"))
                .unwrap();
        assert_eq!(profile.base_url.as_str(), "http://127.0.0.1:4000/");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = SiteRegistry::profile_with_base(SiteKind::Registry, Some("not a url")).unwrap_err();
        assert!(matches!(err, SiteError::InvalidUrl(_)));
    }
}
