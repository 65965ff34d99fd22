//! Trait definitions for `CorpQuery`.

use crate::models::RecordField;

/// Pulls a single record field out of a detail page.
///
/// Site markup changes without notice, so every field is extracted by its
/// own implementation and a site profile owns one extractor per field.
/// Swapping an extractor must never affect the others.
pub trait FieldExtractor: Send + Sync {
    /// The field this extractor produces.
    fn field(&self) -> RecordField;

    /// Extracts the field value, or `None` when the page does not contain it.
    fn extract(&self, html: &str) -> Option<String>;
}
