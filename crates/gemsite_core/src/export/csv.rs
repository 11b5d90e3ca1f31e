//! CSV export of the itinerary items section.
//!
//! # Invariants
//! - Header is exactly `Title,Location,Description`.
//! - Every field is wrapped in double quotes with embedded quotes doubled.
//! - Rows end with `\n`; missing fields export as empty strings.

use crate::model::document::{ContentDocument, ContentValue};
use log::info;
use std::fs;
use std::path::Path;

pub const CSV_HEADER: &str = "Title,Location,Description";
pub const DEFAULT_EXPORT_FILE_NAME: &str = "GEM_Experiences.csv";

const ITEMS_PATH: &str = "stickySection.items";
const COLUMNS: [&str; 3] = ["title", "location", "description"];

/// Renders `stickySection.items` as CSV.
///
/// Entries that are not mappings are skipped; a missing or non-list
/// `items` node yields only the header line.
pub fn itinerary_csv(document: &ContentDocument) -> String {
    let mut csv = format!("{CSV_HEADER}\n");
    let items = document
        .get(ITEMS_PATH)
        .and_then(ContentValue::as_list)
        .unwrap_or_default();

    for item in items.iter().filter_map(ContentValue::as_map) {
        let row = COLUMNS
            .iter()
            .map(|column| {
                quote_field(
                    item.get(*column)
                        .and_then(ContentValue::as_text)
                        .unwrap_or_default(),
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&row);
        csv.push('\n');
    }
    csv
}

/// Writes the itinerary CSV to `path`; returns the number of bytes written.
pub fn write_itinerary_csv(document: &ContentDocument, path: &Path) -> std::io::Result<usize> {
    let csv = itinerary_csv(document);
    fs::write(path, &csv)?;
    info!(
        "event=csv_export module=export status=ok bytes={} path={}",
        csv.len(),
        path.display()
    );
    Ok(csv.len())
}

fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
