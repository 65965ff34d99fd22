//! Scrape outcome types.

use serde::{Deserialize, Serialize};

use super::record::CompanyRecord;

// ============================================================================
// Captcha Or Error Result
// ============================================================================

/// A scrape that could not produce a record.
///
/// `captcha_required` is true for anti-automation challenges and hard
/// failures, false for soft "no data" answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptchaOrErrorResult {
    /// Whether the caller must solve a challenge before retrying.
    pub captcha_required: bool,
    /// Captcha image URL, when one could be located.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captcha_image: Option<String>,
    /// Diagnostic message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CaptchaOrErrorResult {
    /// A captcha/verification challenge or hard failure.
    pub fn captcha(message: impl Into<String>) -> Self {
        Self {
            captcha_required: true,
            captcha_image: None,
            message: Some(message.into()),
        }
    }

    /// A soft failure: the site answered but had no usable data.
    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            captcha_required: false,
            captcha_image: None,
            message: Some(message.into()),
        }
    }

    /// Attaches a captcha image URL.
    #[must_use]
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.captcha_image = image;
        self
    }
}

// ============================================================================
// Scrape Outcome
// ============================================================================

/// The result of scraping one company name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// The company was found, extracted and persisted.
    Found(CompanyRecord),
    /// Captcha, error or "no data"; aborts a batch.
    Blocked(CaptchaOrErrorResult),
    /// The site answered normally but nothing matched the query.
    NotFound,
}

impl ScrapeOutcome {
    /// Returns true if this outcome stops a batch.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }

    /// Returns the record, if one was found.
    pub fn record(&self) -> Option<&CompanyRecord> {
        match self {
            Self::Found(record) => Some(record),
            _ => None,
        }
    }
}

impl From<CaptchaOrErrorResult> for ScrapeOutcome {
    fn from(result: CaptchaOrErrorResult) -> Self {
        Self::Blocked(result)
    }
}
