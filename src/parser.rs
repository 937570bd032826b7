//! Delimited-text record parser.
//!
//! Turns raw comma-separated text into an ordered list of [`FieldMapping`]s.
//! The first non-blank line is the header; every following non-blank line is
//! one record.
//!
//! # Format
//!
//! - Records end with `\n` or `\r\n`; blank lines are skipped
//! - Fields are split on commas outside double quotes
//! - Each value is trimmed, loses one leading and one trailing `"`, and has
//!   `""` collapsed to `"`
//! - A header with no matching value maps to `""`; surplus values are dropped
//! - Every `"` flips the quoting state, wherever it sits in a field. An
//!   unclosed quote therefore runs to the end of the line, and the commas it
//!   swallows stay inside that one value
//!
//! Input with fewer than two non-blank lines yields no records. That is a
//! valid, empty dataset rather than an error.

use crate::models::FieldMapping;
use tracing::debug;

const BOM: char = '\u{feff}';

/// Parse delimited text into records keyed by the header row.
///
/// # Arguments
///
/// * `text` - Raw resource text, optionally starting with a byte-order mark
///
/// # Returns
///
/// One [`FieldMapping`] per data line, in input order, each holding every
/// header in header order. Never fails; malformed lines still produce a
/// record.
pub fn parse(text: &str) -> Vec<FieldMapping> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut lines = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = split_fields(header_line)
        .into_iter()
        .map(|h| strip_enclosing_quotes(h.trim()).to_string())
        .collect();

    let records: Vec<FieldMapping> = lines.map(|line| build_record(&headers, line)).collect();
    if records.is_empty() {
        debug!(headers = headers.len(), "Header without data rows");
    }
    records
}

fn build_record(headers: &[String], line: &str) -> FieldMapping {
    let mut values = split_fields(line).into_iter().map(clean_value);
    headers
        .iter()
        .map(|header| (header.clone(), values.next().unwrap_or_default()))
        .collect()
}

/// Split a line on commas that sit outside double quotes.
///
/// Quote characters are kept in the returned slices; `""` toggles twice and
/// so never changes the quoting state.
fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(&line[start..]);
    fields
}

fn strip_enclosing_quotes(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}

fn clean_value(raw: &str) -> String {
    strip_enclosing_quotes(raw.trim()).replace("\"\"", "\"")
}
