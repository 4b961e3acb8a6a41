//! Declared column sets for the two supported documents.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::label::ColumnLabel;

/// Sheet name of the wide per-line document.
pub const DETAIL_SHEET_NAME: &str = "Detaljeret oversigt";

/// Sheet name of the fixed 10-column summary document.
pub const SUMMARY_SHEET_NAME: &str = "SAP";

/// How the values of a column are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnRole {
    /// Row identifier. Passed through as text, never parsed.
    Identity,
    /// Free text. Passed through as text, never parsed.
    Text,
    /// Amount in kroner. Parsed; unparsable values are kept as text.
    Money,
    /// Unit price. Parsed like money, never totalled.
    AveragePrice,
    /// Quantity. Parsed; zero decimals unless the data shows fractions.
    Count,
    /// Calendar day column (`1`..`31`). Values are status codes, kept as text.
    DayMarker,
}

impl ColumnRole {
    /// True for roles whose cells go through the numeric resolver.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ColumnRole::Money | ColumnRole::AveragePrice | ColumnRole::Count
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnRole::Identity => "identity",
            ColumnRole::Text => "text",
            ColumnRole::Money => "money",
            ColumnRole::AveragePrice => "average-price",
            ColumnRole::Count => "count",
            ColumnRole::DayMarker => "day-marker",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared output column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub label: ColumnLabel,
    pub role: ColumnRole,
    /// Whether the column gets a total in the aggregate row.
    pub summed: bool,
}

impl ColumnSpec {
    pub fn new(label: &str, role: ColumnRole) -> Self {
        Self {
            label: ColumnLabel::new(label),
            role,
            summed: false,
        }
    }

    pub fn summed(label: &str, role: ColumnRole) -> Self {
        Self {
            summed: true,
            ..Self::new(label, role)
        }
    }

    pub fn day(day: u8) -> Self {
        Self::new(&day.to_string(), ColumnRole::DayMarker)
    }
}

/// The two document kinds accepted by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetKind {
    Detail,
    Summary,
}

impl SheetKind {
    pub fn sheet_name(self) -> &'static str {
        match self {
            SheetKind::Detail => DETAIL_SHEET_NAME,
            SheetKind::Summary => SUMMARY_SHEET_NAME,
        }
    }

    /// The declared base schema (without day columns).
    pub fn schema(self) -> SheetSchema {
        match self {
            SheetKind::Detail => SheetSchema::detail(),
            SheetKind::Summary => SheetSchema::summary(),
        }
    }

    /// Whether header cells naming a calendar day become extra columns.
    pub fn accepts_day_columns(self) -> bool {
        matches!(self, SheetKind::Detail)
    }
}

impl fmt::Display for SheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// Ordered column declaration for one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSchema {
    pub kind: SheetKind,
    pub columns: Vec<ColumnSpec>,
}

impl SheetSchema {
    /// 23 base columns of the detail document.
    pub fn detail() -> Self {
        use ColumnRole::{AveragePrice, Count, Identity, Money, Text};
        Self {
            kind: SheetKind::Detail,
            columns: vec![
                ColumnSpec::new("Øko-ID", Identity),
                ColumnSpec::new("Navn", Text),
                ColumnSpec::new("Institution", Text),
                ColumnSpec::new("Afdeling", Text),
                ColumnSpec::new("Kontonr.", Text),
                ColumnSpec::new("Omkostningssted", Text),
                ColumnSpec::new("PSP-element", Text),
                ColumnSpec::new("Varenr.", Text),
                ColumnSpec::new("Varetekst", Text),
                ColumnSpec::new("Enhed", Text),
                ColumnSpec::new("Leverandør", Text),
                ColumnSpec::new("Bestilt af", Text),
                ColumnSpec::new("Bilagsnr.", Text),
                ColumnSpec::new("Bogføringsdato", Text),
                ColumnSpec::new("Periode", Text),
                ColumnSpec::summed("Antal", Count),
                ColumnSpec::summed("Antal leveret", Count),
                ColumnSpec::new("Gns. pris, kr", AveragePrice),
                ColumnSpec::summed("Pris i alt, kr", Money),
                ColumnSpec::summed("Moms, kr", Money),
                ColumnSpec::summed("Rabat, kr", Money),
                ColumnSpec::summed("I alt, kr", Money),
                ColumnSpec::new("Bemærkning", Text),
            ],
        }
    }

    /// Fixed 10 columns of the summary document.
    pub fn summary() -> Self {
        use ColumnRole::{AveragePrice, Count, Money, Text};
        Self {
            kind: SheetKind::Summary,
            columns: vec![
                ColumnSpec::new("Bilagsdato", Text),
                ColumnSpec::new("Bilagsart", Text),
                ColumnSpec::new("Kontonr.", Text),
                ColumnSpec::new("Omkostningssted", Text),
                ColumnSpec::new("PSP-element", Text),
                ColumnSpec::new("Tekst", Text),
                ColumnSpec::summed("Antal", Count),
                ColumnSpec::new("Gns. pris, kr", AveragePrice),
                ColumnSpec::summed("Beløb, kr", Money),
                ColumnSpec::new("Momskode", Text),
            ],
        }
    }

    /// Labels the shape detector scores header candidates against.
    pub fn expected_labels(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|column| column.label.as_str())
            .collect()
    }

    /// Appends day-marker columns in ascending order, skipping duplicates.
    pub fn with_day_columns(mut self, days: &[u8]) -> Self {
        let mut days: Vec<u8> = days.to_vec();
        days.sort_unstable();
        days.dedup();
        self.columns.extend(days.into_iter().map(ColumnSpec::day));
        self
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Parses a header cell that names a calendar day (`"1"`..`"31"`, 1–2 digits).
pub fn day_number(header: &str) -> Option<u8> {
    let trimmed = header.trim();
    if trimmed.is_empty() || trimmed.len() > 2 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let day: u8 = trimmed.parse().ok()?;
    (1..=31).contains(&day).then_some(day)
}
