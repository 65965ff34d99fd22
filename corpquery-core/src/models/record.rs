//! Company record types.
//!
//! This module contains:
//! - [`CompanyRecord`] - One company's registration details
//! - [`RecordField`] - The extracted fields of a record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Sentinel stored for any field the scraper could not extract.
pub const UNKNOWN: &str = "unknown";

// ============================================================================
// Record Field
// ============================================================================

/// A field extracted from a company detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordField {
    /// Registered company name.
    Name,
    /// Unified social credit code / registration number.
    RegNumber,
    /// Legal representative.
    LegalRep,
    /// Registered capital.
    Capital,
    /// Establishment date.
    Established,
}

impl RecordField {
    /// Returns all fields in record order.
    pub fn all() -> &'static [RecordField] {
        &[
            Self::Name,
            Self::RegNumber,
            Self::LegalRep,
            Self::Capital,
            Self::Established,
        ]
    }

    /// Returns the JSON key of this field.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::RegNumber => "regNumber",
            Self::LegalRep => "legalRep",
            Self::Capital => "capital",
            Self::Established => "established",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ============================================================================
// Company Record
// ============================================================================

/// One successfully extracted company.
///
/// Records are created once per successful scrape and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    /// Company name, or the query string when the page had none.
    pub name: String,
    /// Registration number.
    pub reg_number: String,
    /// Legal representative.
    pub legal_rep: String,
    /// Registered capital.
    pub capital: String,
    /// Establishment date as printed by the site.
    pub established: String,
    /// When the record was scraped.
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl CompanyRecord {
    /// Builds a record from per-field lookups.
    ///
    /// Missing fields become [`UNKNOWN`]; a missing name falls back to `query`.
    pub fn from_fields<F>(query: &str, mut lookup: F, timestamp: DateTime<Utc>) -> Self
    where
        F: FnMut(RecordField) -> Option<String>,
    {
        let name = lookup(RecordField::Name).unwrap_or_else(|| query.to_string());
        let mut value = |field| lookup(field).unwrap_or_else(|| UNKNOWN.to_string());

        Self {
            name,
            reg_number: value(RecordField::RegNumber),
            legal_rep: value(RecordField::LegalRep),
            capital: value(RecordField::Capital),
            established: value(RecordField::Established),
            timestamp,
        }
    }

    /// Returns the value of a field.
    pub fn get(&self, field: RecordField) -> &str {
        match field {
            RecordField::Name => &self.name,
            RecordField::RegNumber => &self.reg_number,
            RecordField::LegalRep => &self.legal_rep,
            RecordField::Capital => &self.capital,
            RecordField::Established => &self.established,
        }
    }

    /// Milliseconds since the Unix epoch for [`Self::timestamp`].
    pub fn epoch_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    /// Parses a record from its stored JSON form.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the record to its stored JSON form.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

// ============================================================================
// Timestamp Format
// ============================================================================

/// ISO-8601 UTC with millisecond precision (`2024-05-01T08:30:00.123Z`).
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
