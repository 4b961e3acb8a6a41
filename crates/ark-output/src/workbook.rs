//! In-memory workbook model, independent of serialization.
//!
//! Rows are 1-based as in spreadsheet addresses; columns are 0-based
//! indices and become letters only when a cell reference is rendered.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{OutputError, Result};

/// Longest sheet name spreadsheet applications accept.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Font variants used by the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    /// Bold, 14pt.
    Heading,
}

/// Visual style of one cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CellStyle {
    pub font: FontStyle,
    /// Thin border on all four sides.
    pub bordered: bool,
    /// Spreadsheet number format code, e.g. `#,##0.00`.
    pub number_format: Option<String>,
}

impl CellStyle {
    pub fn title() -> Self {
        Self {
            font: FontStyle::Heading,
            ..Self::default()
        }
    }

    pub fn subtitle() -> Self {
        Self {
            font: FontStyle::Italic,
            ..Self::default()
        }
    }

    pub fn header() -> Self {
        Self {
            font: FontStyle::Bold,
            bordered: true,
            number_format: None,
        }
    }

    pub fn data(number_format: Option<String>) -> Self {
        Self {
            font: FontStyle::Regular,
            bordered: true,
            number_format,
        }
    }

    pub fn total(number_format: Option<String>) -> Self {
        Self {
            font: FontStyle::Bold,
            bordered: true,
            number_format,
        }
    }

    pub fn footer() -> Self {
        Self::subtitle()
    }
}

/// Content of one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Styled cell without content.
    Blank,
    Text(String),
    Number(Decimal),
    /// Formula with the value a reader shows before recalculation.
    Formula {
        expr: String,
        cached: Option<Decimal>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub style: CellStyle,
}

impl Cell {
    pub fn new(value: CellValue, style: CellStyle) -> Self {
        Self { value, style }
    }

    pub fn text(text: impl Into<String>, style: CellStyle) -> Self {
        Self::new(CellValue::Text(text.into()), style)
    }

    pub fn number(value: Decimal, style: CellStyle) -> Self {
        Self::new(CellValue::Number(value), style)
    }

    pub fn blank(style: CellStyle) -> Self {
        Self::new(CellValue::Blank, style)
    }
}

/// Rectangular merged range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedRange {
    pub first_row: u32,
    pub first_col: u32,
    pub last_row: u32,
    pub last_col: u32,
}

impl MergedRange {
    /// Single-row range across `first_col..=last_col`.
    pub fn row_span(row: u32, first_col: u32, last_col: u32) -> Self {
        Self {
            first_row: row,
            first_col,
            last_row: row,
            last_col,
        }
    }

    /// `A1:Z1`-style reference.
    pub fn reference(&self) -> String {
        format!(
            "{}:{}",
            cell_ref(self.first_row, self.first_col),
            cell_ref(self.last_row, self.last_col)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    name: String,
    rows: BTreeMap<u32, BTreeMap<u32, Cell>>,
    merges: Vec<MergedRange>,
    column_widths: BTreeMap<u32, f64>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: BTreeMap::new(),
            merges: Vec::new(),
            column_widths: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Place a cell at a 1-based row and 0-based column, replacing any
    /// previous content.
    pub fn set(&mut self, row: u32, col: u32, cell: Cell) {
        self.rows.entry(row).or_default().insert(col, cell);
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.rows.get(&row).and_then(|cells| cells.get(&col))
    }

    /// Cells of one row, ordered by column.
    pub fn row(&self, row: u32) -> impl Iterator<Item = (u32, &Cell)> {
        self.rows
            .get(&row)
            .into_iter()
            .flat_map(|cells| cells.iter().map(|(col, cell)| (*col, cell)))
    }

    /// Populated rows in ascending order.
    pub fn rows(&self) -> impl Iterator<Item = (u32, &BTreeMap<u32, Cell>)> {
        self.rows.iter().map(|(row, cells)| (*row, cells))
    }

    /// Highest populated row, 0 for an empty sheet.
    pub fn last_row(&self) -> u32 {
        self.rows.keys().next_back().copied().unwrap_or(0)
    }

    pub fn merge(&mut self, range: MergedRange) {
        self.merges.push(range);
    }

    pub fn merges(&self) -> &[MergedRange] {
        &self.merges
    }

    pub fn set_column_width(&mut self, col: u32, width: f64) {
        self.column_widths.insert(col, width);
    }

    pub fn column_width(&self, col: u32) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    pub fn column_widths(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.column_widths.iter().map(|(col, width)| (*col, *width))
    }
}

/// Ordered collection of uniquely named worksheets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet after validating its name.
    pub fn add_sheet(&mut self, sheet: Worksheet) -> Result<()> {
        validate_sheet_name(sheet.name())?;
        let lowered = sheet.name().to_lowercase();
        if self
            .sheets
            .iter()
            .any(|existing| existing.name().to_lowercase() == lowered)
        {
            return Err(OutputError::DuplicateSheetName {
                name: sheet.name().to_string(),
            });
        }
        self.sheets.push(sheet);
        Ok(())
    }

    pub fn sheets(&self) -> &[Worksheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|sheet| sheet.name() == name)
    }
}

/// Check the naming rules shared by spreadsheet applications.
pub fn validate_sheet_name(name: &str) -> Result<()> {
    let invalid = |reason| {
        Err(OutputError::InvalidSheetName {
            name: name.to_string(),
            reason,
        })
    };
    if name.trim().is_empty() {
        return invalid("must not be empty");
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return invalid("longer than 31 characters");
    }
    if name.contains(FORBIDDEN_SHEET_CHARS) {
        return invalid("contains a forbidden character");
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return invalid("must not start or end with an apostrophe");
    }
    Ok(())
}

/// Column letters for a 0-based column index (`0` is `A`, `26` is `AA`).
pub fn column_letter(col: u32) -> String {
    let mut n = col + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push(char::from(b'A' + rem));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// `A1`-style reference for a 1-based row and 0-based column.
pub fn cell_ref(row: u32, col: u32) -> String {
    format!("{}{row}", column_letter(col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(21), "V");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
        assert_eq!(cell_ref(5, 21), "V5");
    }

    #[test]
    fn test_sheet_name_rules() {
        assert!(validate_sheet_name("Detaljeret oversigt").is_ok());
        assert!(validate_sheet_name("SAP").is_ok());
        assert!(validate_sheet_name("").is_err());
        assert!(validate_sheet_name("a/b").is_err());
        assert!(validate_sheet_name("[x]").is_err());
        assert!(validate_sheet_name("'quoted'").is_err());
        assert!(validate_sheet_name(&"x".repeat(32)).is_err());
        assert!(validate_sheet_name(&"ø".repeat(31)).is_ok());
    }

    #[test]
    fn test_duplicate_sheet_names_are_rejected() {
        let mut workbook = Workbook::new();
        workbook.add_sheet(Worksheet::new("SAP")).unwrap();
        let err = workbook.add_sheet(Worksheet::new("sap")).unwrap_err();
        assert!(matches!(err, OutputError::DuplicateSheetName { .. }));
        assert_eq!(workbook.sheets().len(), 1);
    }

    #[test]
    fn test_cells_are_addressed_by_row_and_column() {
        let mut sheet = Worksheet::new("SAP");
        sheet.set(4, 1, Cell::text("Tekst", CellStyle::header()));
        sheet.set(4, 0, Cell::text("Bilagsdato", CellStyle::header()));
        sheet.set(1, 0, Cell::text("SAP", CellStyle::title()));

        assert_eq!(sheet.last_row(), 4);
        let header: Vec<u32> = sheet.row(4).map(|(col, _)| col).collect();
        assert_eq!(header, vec![0, 1]);
        assert_eq!(
            sheet.cell(1, 0).map(|cell| &cell.value),
            Some(&CellValue::Text("SAP".to_string()))
        );
        assert!(sheet.cell(2, 0).is_none());
    }

    #[test]
    fn test_merged_range_reference() {
        assert_eq!(MergedRange::row_span(1, 0, 25).reference(), "A1:Z1");
    }
}
