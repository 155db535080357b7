//! Scraped business records and the errors reported alongside them

use serde::{Deserialize, Serialize};
use std::fmt;

/// One business listing extracted from a detail page
///
/// Every field is a string and defaults to empty when nothing could be
/// extracted. The serialized column names are the ones the email generator
/// reads back (`nom`, `description`, `website`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(rename = "nom")]
    pub name: String,

    #[serde(rename = "lien_trustpilot")]
    pub source_link: String,

    #[serde(rename = "nombre_avis")]
    pub review_count: String,

    pub rating: String,

    #[serde(rename = "adresse")]
    pub address: String,

    pub email: String,

    pub website: String,

    pub phone: String,

    pub description: String,
}

/// Field labels in column order, as used by the fill-rate report
pub const RECORD_FIELDS: [&str; 9] = [
    "nom",
    "lien_trustpilot",
    "nombre_avis",
    "rating",
    "adresse",
    "email",
    "website",
    "phone",
    "description",
];

impl CompanyRecord {
    /// An all-empty record for a link that could not be processed
    pub fn empty(source_link: impl Into<String>) -> Self {
        Self {
            source_link: source_link.into(),
            ..Self::default()
        }
    }

    /// Field values in column order, matching [`RECORD_FIELDS`]
    pub fn fields(&self) -> [&str; 9] {
        [
            &self.name,
            &self.source_link,
            &self.review_count,
            &self.rating,
            &self.address,
            &self.email,
            &self.website,
            &self.phone,
            &self.description,
        ]
    }

    /// Number of non-empty fields, source link included
    pub fn filled_count(&self) -> usize {
        self.fields().iter().filter(|v| !v.is_empty()).count()
    }

    /// True when nothing besides the source link was extracted
    pub fn has_no_data(&self) -> bool {
        self.fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 1)
            .all(|(_, v)| v.is_empty())
    }
}

/// Category of a recorded failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The page kept answering 403 until the retry budget ran out
    Blocked,
    /// Network failure, unexpected status or exhausted retries
    Network,
    /// The page loaded but no field could be extracted
    NoData,
}

/// A failure recorded for reporting; never retried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub kind: ErrorKind,
    pub url: String,
    pub detail: String,
}

impl ErrorEntry {
    pub fn blocked(url: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Blocked,
            url: url.into(),
            detail: detail.into(),
        }
    }

    pub fn network(url: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Network,
            url: url.into(),
            detail: detail.into(),
        }
    }

    pub fn no_data(url: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::NoData,
            url: url.into(),
            detail: String::new(),
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.kind == ErrorKind::Blocked
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::NoData => write!(f, "No data extracted: {}", self.url),
            ErrorKind::Blocked => write!(f, "Error loading {} (403): {}", self.url, self.detail),
            ErrorKind::Network => write!(f, "Error loading {}: {}", self.url, self.detail),
        }
    }
}
