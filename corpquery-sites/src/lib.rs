// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `CorpQuery` Sites
//!
//! Site profiles and the scraper that drives them.
//!
//! Each site module includes:
//!
//! - **Descriptor**: URLs, markers and flags for the site
//! - **Parser**: Regex patterns for the company fields
//!
//! ## Supported Sites
//!
//! | Site | Session cookie | Detail page | Name required |
//! |------|----------------|-------------|---------------|
//! | `registry` (official) | no | no | yes |
//! | `aggregator` | yes | yes | no |
//!
//! ## Usage
//!
//! ```ignore
//! use corpquery_sites::{Scraper, SiteKind, SiteRegistry};
//!
//! let profile = SiteRegistry::profile(SiteKind::Aggregator)?;
//! let scraper = Scraper::new(profile, transport, store);
//! let outcome = scraper.fetch_company_info("Acme Ltd", None).await;
//! ```

pub mod classify;
pub mod descriptor;
pub mod error;
pub mod extract;
pub mod registry;
pub mod scraper;

// Site modules
pub mod aggregator;
pub mod official;

// Re-export key types
pub use classify::{Classification, classify};
pub use descriptor::{
    CaptchaKind, CaptchaMarker, DEFAULT_MIN_BODY_LEN, SiteKind, SiteProfile, SiteProfileBuilder,
};
pub use error::SiteError;
pub use extract::{RegexExtractor, clean_text};
pub use registry::SiteRegistry;
pub use scraper::Scraper;

// Re-export profile constructors
pub use aggregator::aggregator_profile;
pub use official::registry_profile;
