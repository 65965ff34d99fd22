// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `CorpQuery` Core
//!
//! Core types, models, and traits for the `CorpQuery` service.
//!
//! This crate provides the foundational abstractions used across all other
//! `CorpQuery` crates:
//!
//! - Domain models (company records, scrape outcomes)
//! - Error types
//! - The field extraction trait implemented by site profiles
//!
//! ## Key Types
//!
//! ### Records
//! - [`CompanyRecord`] - One successfully extracted company
//! - [`RecordField`] - The five extracted fields
//!
//! ### Outcomes
//! - [`ScrapeOutcome`] - Result of scraping one company name
//! - [`CaptchaOrErrorResult`] - Captcha challenge or soft failure

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{CaptchaOrErrorResult, CompanyRecord, RecordField, ScrapeOutcome, UNKNOWN};

// Re-export traits
pub use traits::FieldExtractor;
