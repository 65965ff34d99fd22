//! Domain models for `CorpQuery`.
//!
//! ## Submodules
//!
//! - [`record`] - Company records and the fields extracted for them
//! - [`outcome`] - Scrape outcomes (found, blocked, not found)

mod outcome;
mod record;

// Re-export everything at the models level
pub use outcome::{CaptchaOrErrorResult, ScrapeOutcome};
pub use record::{CompanyRecord, RecordField, UNKNOWN};

#[cfg(test)]
mod serde_tests;
