//! Export transforms over a collected record list.
//!
//! All three formats are pure functions of the record slice; the decision
//! of what to do with zero records (the `no_data` protocol response) is
//! the caller's, not the transform's.

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// UTF-8 byte-order mark, prepended for spreadsheet importers that
/// default to a legacy text encoding.
const UTF8_BOM: &str = "\u{feff}";

const CSV_HEADER: &str = "\"Name\",\"Phone\",\"Website\",\"Address\",\"Rating\",\"Reviews\",\"URL\"";

/// Output format for [`export_records`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// CSV: quoted fields, embedded quotes doubled, empty for missing.
    TabularPlain,
    /// The same CSV prefixed with a UTF-8 BOM.
    TabularExcel,
    /// Pretty-printed JSON with camelCase field names.
    StructuredDocument,
}

/// Serializes `records` in the requested format.
///
/// # Errors
///
/// Only [`ExportFormat::StructuredDocument`] can fail, and only if JSON
/// serialization does (which `Record` cannot trigger in practice); the
/// error is surfaced rather than swallowed so the protocol layer can
/// report it.
pub fn export_records(records: &[Record], format: ExportFormat) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::TabularPlain => Ok(to_csv(records)),
        ExportFormat::TabularExcel => Ok(format!("{UTF8_BOM}{}", to_csv(records))),
        ExportFormat::StructuredDocument => serde_json::to_string_pretty(records),
    }
}

fn to_csv(records: &[Record]) -> String {
    let mut out = String::with_capacity(64 + records.len() * 128);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for rec in records {
        let fields = [
            rec.name.as_str(),
            rec.phone.as_deref().unwrap_or(""),
            rec.website.as_deref().unwrap_or(""),
            rec.address.as_deref().unwrap_or(""),
            rec.rating.as_deref().unwrap_or(""),
            rec.review_count.as_deref().unwrap_or(""),
            rec.source_url.as_str(),
        ];
        let row = fields
            .iter()
            .map(|f| quote_field(f))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&row);
        out.push('\n');
    }
    out
}

/// Wraps a field in double quotes, doubling any embedded quotes.
fn quote_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
