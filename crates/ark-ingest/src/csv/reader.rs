//! Quote-aware row splitting that keeps blank lines.
//!
//! Row indices produced here are the coordinates the shape detector and
//! the row normalizer agree on, so no line is ever dropped at this stage:
//! a blank line becomes an empty row.

use ::csv::{ReaderBuilder, StringRecord};

use ark_model::Delimiter;

use crate::error::{IngestError, Result};

/// Trims whitespace and stray byte-order marks from a cell.
pub fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

/// Splits text into logical lines, keeping line breaks inside quoted fields.
///
/// A quote opens a quoted field only as the first byte of a field, the
/// way the `csv` crate reads it; a quote inside an unquoted field (an inch
/// mark in `Rør 3" galv`) is literal. `""` inside a quoted field is an
/// escaped quote. `\r\n` and `\n` both end a line; a trailing line break
/// does not produce an extra empty line.
pub fn logical_lines(text: &str, delimiter: u8) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut in_quotes = false;
    let mut field_start = true;
    let mut start = 0usize;
    let mut idx = 0usize;
    while idx < bytes.len() {
        let byte = bytes[idx];
        if in_quotes {
            if byte == b'"' {
                if bytes.get(idx + 1) == Some(&b'"') {
                    idx += 1;
                } else {
                    in_quotes = false;
                }
            }
        } else if byte == b'\n' {
            lines.push(text[start..idx].trim_end_matches('\r'));
            start = idx + 1;
            field_start = true;
        } else if byte == delimiter {
            field_start = true;
        } else if byte == b'"' && field_start {
            in_quotes = true;
            field_start = false;
        } else if byte != b'\r' {
            field_start = false;
        }
        idx += 1;
    }
    if in_quotes {
        // Unterminated quote: keep the remaining lines instead of one run-on row.
        lines.extend(
            text[start..]
                .strip_suffix('\n')
                .unwrap_or(&text[start..])
                .split('\n')
                .map(|line| line.trim_end_matches('\r')),
        );
    } else if start < text.len() {
        lines.push(text[start..].trim_end_matches('\r'));
    }
    lines
}

/// Splits delimited text into rows of trimmed cells.
///
/// Blank lines become empty rows so that row indices match source lines.
pub fn split_rows(text: &str, delimiter: Delimiter) -> Result<Vec<Vec<String>>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    for (idx, line) in logical_lines(text, delimiter.as_byte())
        .into_iter()
        .enumerate()
    {
        if line.trim().is_empty() {
            rows.push(Vec::new());
            continue;
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter.as_byte())
            .from_reader(line.as_bytes());
        let found = reader
            .read_record(&mut record)
            .map_err(|source| IngestError::CsvParse {
                line: idx + 1,
                source,
            })?;
        if found {
            rows.push(record.iter().map(normalize_cell).collect());
        } else {
            rows.push(Vec::new());
        }
    }
    Ok(rows)
}
