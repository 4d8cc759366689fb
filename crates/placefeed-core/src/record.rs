//! The scraped listing record and its deduplication key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One business listing extracted from the result feed.
///
/// Serialized field names are camelCase and match the structured-document
/// export format verbatim. All extracted values are kept as text: ratings
/// and review counts are display strings, not parsed numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Listing display name. Never empty for a committed record.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Decimal-as-text, e.g. `"4.5"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    /// Digits only; thousands separators are stripped at extraction time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// The original listing link, stored unmodified.
    pub source_url: String,
    pub captured_at: DateTime<Utc>,
}

impl Record {
    /// Deduplication key for this record. See [`canonical_key`].
    #[must_use]
    pub fn canonical_key(&self) -> String {
        canonical_key(&self.source_url)
    }
}

/// Derives the deduplication key for a listing link: the URL with any
/// query component removed.
///
/// The same place is frequently linked with varying query parameters
/// (locale hints, session state), so the query must not participate in
/// identity. The stored `source_url` keeps the original form.
#[must_use]
pub fn canonical_key(url: &str) -> String {
    match url.find('?') {
        Some(pos) => url[..pos].to_owned(),
        None => url.to_owned(),
    }
}
