//! Delimiter and header-row detection.
//!
//! Column order, decorative rows and the optional title/subtitle lines are
//! not fixed, so the header is found by scoring: every candidate delimiter
//! splits the text, and every row in the scan window is scored by how many
//! expected labels it contains. The best delimiter/row pair wins; ties keep
//! the earlier delimiter and the earlier row.
//!
//! Detection never removes rows. Filtering noise is the row normalizer's job.

use std::collections::BTreeSet;

use ark_model::label::normalize_label;
use ark_model::{Delimiter, DetectionConfidence, ShapeDescriptor};
use tracing::{debug, warn};

use crate::csv::split_rows;
use crate::error::Result;

/// Rows examined when looking for the header.
pub const SCAN_WINDOW: usize = 12;

/// First-cell prefix (case-insensitive) marking a period title in row 0.
pub const TITLE_SENTINEL: &str = "periode";

/// Detected shape plus the rows split with the chosen delimiter.
#[derive(Debug, Clone)]
pub struct DetectedShape {
    pub shape: ShapeDescriptor,
    pub rows: Vec<Vec<String>>,
}

/// Detect delimiter, header row, title and subtitle.
pub fn detect(raw_text: &str, expected_labels: &[&str]) -> Result<ShapeDescriptor> {
    detect_shape(raw_text, expected_labels).map(|detected| detected.shape)
}

/// Like [`detect`], also returning the rows split with the chosen delimiter.
pub fn detect_shape(raw_text: &str, expected_labels: &[&str]) -> Result<DetectedShape> {
    let expected: BTreeSet<String> = expected_labels
        .iter()
        .map(|label| normalize_label(label))
        .filter(|key| !key.is_empty())
        .collect();

    let mut best: Option<Candidate> = None;
    for delimiter in Delimiter::CANDIDATES {
        let rows = split_rows(raw_text, delimiter)?;
        let (row, score) = best_header_row(&rows, &expected);
        let improves = best.as_ref().is_none_or(|current| score > current.score);
        if improves {
            best = Some(Candidate {
                delimiter,
                header_row_index: row,
                score,
                rows,
            });
        }
    }

    let Candidate {
        delimiter,
        header_row_index,
        score,
        rows,
    } = match best {
        Some(candidate) => candidate,
        None => Candidate {
            delimiter: Delimiter::Semicolon,
            header_row_index: 0,
            score: 0,
            rows: Vec::new(),
        },
    };

    let confidence = DetectionConfidence {
        matched: score,
        expected: expected.len(),
    };
    if confidence.is_fallback() {
        warn!(
            delimiter = %delimiter,
            expected = expected.len(),
            "no header row matched any expected label, using row 0"
        );
    } else {
        debug!(
            delimiter = %delimiter,
            header_row = header_row_index,
            matched = score,
            expected = expected.len(),
            "detected header row"
        );
    }

    let title = detect_title(&rows, header_row_index);
    let subtitle = detect_subtitle(&rows, header_row_index);
    Ok(DetectedShape {
        shape: ShapeDescriptor {
            delimiter,
            header_row_index,
            title,
            subtitle,
            confidence,
        },
        rows,
    })
}

struct Candidate {
    delimiter: Delimiter,
    header_row_index: usize,
    score: usize,
    rows: Vec<Vec<String>>,
}

/// Highest-scoring row in the scan window; row 0 when nothing scores.
fn best_header_row(rows: &[Vec<String>], expected: &BTreeSet<String>) -> (usize, usize) {
    let mut best = (0usize, 0usize);
    for (idx, row) in rows.iter().take(SCAN_WINDOW).enumerate() {
        let score = score_row(row, expected);
        if score > best.1 {
            best = (idx, score);
        }
    }
    best
}

/// Number of expected labels present in the row.
fn score_row(row: &[String], expected: &BTreeSet<String>) -> usize {
    let present: BTreeSet<String> = row.iter().map(|cell| normalize_label(cell)).collect();
    expected.iter().filter(|key| present.contains(*key)).count()
}

/// Non-empty cells joined by a single space.
fn joined(row: &[String]) -> String {
    row.iter()
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn detect_title(rows: &[Vec<String>], header_row_index: usize) -> Option<String> {
    if header_row_index == 0 {
        return None;
    }
    let first = rows.first()?;
    let lead = first.first()?.trim().to_lowercase();
    if !lead.starts_with(TITLE_SENTINEL) {
        return None;
    }
    Some(joined(first))
}

fn detect_subtitle(rows: &[Vec<String>], header_row_index: usize) -> Option<String> {
    rows.iter()
        .take(header_row_index)
        .skip(1)
        .map(|row| joined(row))
        .find(|text| !text.is_empty())
}
