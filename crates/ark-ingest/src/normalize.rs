//! Row normalization: noise filtering and label/value zipping.

use ark_model::{ColumnLabel, Record, day_number};
use tracing::debug;

/// First-cell prefixes (case-insensitive) of trailing "extracted at" lines.
pub const TRAILING_SENTINELS: [&str; 2] = ["udtrukket", "dannet"];

/// Records after the header row, in source order.
#[derive(Debug, Clone, Default)]
pub struct NormalizedRows {
    pub headers: Vec<ColumnLabel>,
    pub records: Vec<Record>,
    /// Blank rows and trailing annotation lines that were left out.
    pub dropped: usize,
}

/// Header labels with synthetic positional labels for blank header cells.
///
/// Day headers are relabelled without leading zeros (`"02"` becomes `"2"`)
/// so they join the day columns of the schema.
pub fn header_labels(header_row: &[String]) -> Vec<ColumnLabel> {
    header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            if cell.trim().is_empty() {
                ColumnLabel::positional(idx + 1)
            } else if let Some(day) = day_number(cell) {
                ColumnLabel::new(day.to_string())
            } else {
                ColumnLabel::new(cell.as_str())
            }
        })
        .collect()
}

/// True for rows that carry no data: all cells blank, or a trailing
/// extraction-time annotation.
pub fn is_noise_row(row: &[String]) -> bool {
    if row.iter().all(|cell| cell.trim().is_empty()) {
        return true;
    }
    let lead = row
        .first()
        .map(|cell| cell.trim().to_lowercase())
        .unwrap_or_default();
    TRAILING_SENTINELS
        .iter()
        .any(|sentinel| lead.starts_with(sentinel))
}

/// Convert every row after the header into a [`Record`].
///
/// Only noise rows are dropped; sparse rows are kept because detail rows
/// legitimately leave many optional columns empty.
pub fn normalize(rows: &[Vec<String>], header_row_index: usize) -> NormalizedRows {
    let Some(header_row) = rows.get(header_row_index) else {
        return NormalizedRows::default();
    };
    let headers = header_labels(header_row);

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for (offset, row) in rows.iter().enumerate().skip(header_row_index + 1) {
        if is_noise_row(row) {
            dropped += 1;
            continue;
        }
        let cells = row
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                let label = headers
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| ColumnLabel::positional(idx + 1));
                (label, value.clone())
            })
            .collect();
        records.push(Record::new(offset, cells));
    }

    debug!(kept = records.len(), dropped, "normalized rows");
    NormalizedRows {
        headers,
        records,
        dropped,
    }
}
