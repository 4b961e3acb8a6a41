//! One normalized data row.

use serde::{Deserialize, Serialize};

use crate::label::ColumnLabel;

/// Header labels zipped with the raw cell text of one data row.
///
/// Cells keep their source order. Lookups try the exact label text first
/// and fall back to the lenient key comparison of [`ColumnLabel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Zero-based index of the row in the split document.
    pub source_row: usize,
    cells: Vec<(ColumnLabel, String)>,
}

impl Record {
    pub fn new(source_row: usize, cells: Vec<(ColumnLabel, String)>) -> Self {
        Self { source_row, cells }
    }

    /// Raw text for a declared column, or `None` when the column is absent.
    pub fn get(&self, declared: &ColumnLabel) -> Option<&str> {
        self.cells
            .iter()
            .find(|(label, _)| label.as_str() == declared.as_str())
            .or_else(|| {
                self.cells
                    .iter()
                    .find(|(label, _)| label.key() == declared.key())
            })
            .map(|(_, value)| value.as_str())
    }

    pub fn cells(&self) -> &[(ColumnLabel, String)] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        Record::new(
            5,
            pairs
                .iter()
                .map(|(label, value)| (ColumnLabel::new(*label), (*value).to_string()))
                .collect(),
        )
    }

    #[test]
    fn exact_label_wins_over_lenient_match() {
        let row = record(&[("I alt kr", "1"), ("I alt, kr", "2")]);
        assert_eq!(row.get(&ColumnLabel::new("I alt, kr")), Some("2"));
    }

    #[test]
    fn lenient_match_tolerates_header_drift() {
        let row = record(&[("ØKO-ID", "100"), ("I alt,kr", "1.234,50")]);
        assert_eq!(row.get(&ColumnLabel::new("Øko-ID")), Some("100"));
        assert_eq!(row.get(&ColumnLabel::new("I alt, kr")), Some("1.234,50"));
        assert_eq!(row.get(&ColumnLabel::new("Navn")), None);
    }
}
