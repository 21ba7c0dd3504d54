// ABOUTME: Key ordering shared by the merge driver and every schema-object kind
// ABOUTME: Byte-wise comparison matching the COLLATE "C" order of the catalog queries

use super::row::SchemaRow;
use std::cmp::Ordering;

/// Compare two rows by `key_fields` in priority order
///
/// Values are compared byte by byte, never through a locale, so the result agrees with
/// the `COLLATE "C"` ordering the catalog queries request. Any disagreement here would
/// make the merge misclassify rows as added or dropped.
pub fn compare_rows(a: &SchemaRow, b: &SchemaRow, key_fields: &[&str]) -> Ordering {
    for field in key_fields {
        let ordering = a.attr(field).as_bytes().cmp(b.attr(field).as_bytes());
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Render the key of a row for log messages, e.g. `users.email`
pub fn describe_key(row: &SchemaRow, key_fields: &[&str]) -> String {
    key_fields
        .iter()
        .map(|field| row.get(field).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(".")
}
