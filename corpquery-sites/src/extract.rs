//! Regex field extraction.

use corpquery_core::{FieldExtractor, RecordField};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::SiteError;

/// Matches any HTML tag.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

/// Matches runs of whitespace, including full-width spaces.
static SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\x{3000}]+").expect("Invalid regex"));

/// Extracts a field from the first capture group of a regex.
#[derive(Debug, Clone)]
pub struct RegexExtractor {
    field: RecordField,
    pattern: Regex,
}

impl RegexExtractor {
    /// Creates an extractor from a compiled regex.
    pub fn new(field: RecordField, pattern: Regex) -> Self {
        Self { field, pattern }
    }

    /// Compiles `pattern` into an extractor.
    pub fn from_pattern(field: RecordField, pattern: &str) -> Result<Self, SiteError> {
        Ok(Self::new(field, Regex::new(pattern)?))
    }
}

impl FieldExtractor for RegexExtractor {
    fn field(&self) -> RecordField {
        self.field
    }

    fn extract(&self, html: &str) -> Option<String> {
        let captured = self.pattern.captures(html)?.get(1)?;
        clean_text(captured.as_str())
    }
}

/// Strips tags, decodes common entities and collapses whitespace.
///
/// Returns `None` when nothing readable is left.
pub fn clean_text(raw: &str) -> Option<String> {
    let without_tags = TAG_RE.replace_all(raw, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    let collapsed = SPACE_RE.replace_all(&decoded, " ");
    let text = collapsed.trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
