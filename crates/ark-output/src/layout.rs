//! Layout emitter: places a typed table on a worksheet.
//!
//! Fixed positions: title on row 1, optional subtitle on row 2, header on
//! row 4, data from row 5. The totals row follows the last data row and the
//! footer sits two rows below it. A document without data rows gets no
//! totals row; its footer lands on row 7, where it would sit if the header
//! were the last data row.

use ark_model::{ColumnFormat, ColumnRole};
use ark_transform::{TypedCell, TypedColumn, TypedTable};
use rust_decimal::Decimal;
use tracing::debug;

use crate::workbook::{Cell, CellStyle, CellValue, MergedRange, Worksheet, column_letter};

pub const TITLE_ROW: u32 = 1;
pub const SUBTITLE_ROW: u32 = 2;
pub const HEADER_ROW: u32 = 4;
pub const FIRST_DATA_ROW: u32 = 5;

/// Label written in the first column of the totals row.
pub const TOTAL_LABEL: &str = "I alt";

/// Footer text before the extraction timestamp.
pub const FOOTER_PREFIX: &str = "Data udtrukket:";

const MIN_COLUMN_WIDTH: usize = 6;
const MIN_DAY_COLUMN_WIDTH: usize = 5;
const MAX_COLUMN_WIDTH: usize = 60;
const COLUMN_PADDING: usize = 2;

/// Text placed around the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetHeading {
    /// Detected title; the sheet name is used when absent.
    pub title: Option<String>,
    pub subtitle: Option<String>,
    /// Extraction timestamp shown in the footer, verbatim.
    pub extracted_at: String,
}

/// Row positions for a table with a given number of data rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPlan {
    pub header_row: u32,
    /// Inclusive data row range; `None` for an empty table.
    pub data_rows: Option<(u32, u32)>,
    pub totals_row: Option<u32>,
    pub footer_row: u32,
}

impl RowPlan {
    pub fn for_rows(count: usize) -> Self {
        if count == 0 {
            return Self {
                header_row: HEADER_ROW,
                data_rows: None,
                totals_row: None,
                footer_row: HEADER_ROW + 3,
            };
        }
        let last = HEADER_ROW + count as u32;
        Self {
            header_row: HEADER_ROW,
            data_rows: Some((FIRST_DATA_ROW, last)),
            totals_row: Some(last + 1),
            footer_row: last + 3,
        }
    }
}

/// Lay out one typed table as a worksheet named after its sheet kind.
pub fn emit_sheet(table: &TypedTable, heading: &SheetHeading) -> Worksheet {
    let name = table.kind.sheet_name();
    let mut sheet = Worksheet::new(name);
    let plan = RowPlan::for_rows(table.rows.len());
    let last_col = table.columns.len().saturating_sub(1) as u32;

    let title = heading.title.as_deref().unwrap_or(name);
    sheet.set(TITLE_ROW, 0, Cell::text(title, CellStyle::title()));
    if last_col > 0 {
        sheet.merge(MergedRange::row_span(TITLE_ROW, 0, last_col));
    }
    if let Some(subtitle) = &heading.subtitle {
        sheet.set(SUBTITLE_ROW, 0, Cell::text(subtitle.as_str(), CellStyle::subtitle()));
        if last_col > 0 {
            sheet.merge(MergedRange::row_span(SUBTITLE_ROW, 0, last_col));
        }
    }

    for (col, column) in table.columns.iter().enumerate() {
        sheet.set(
            plan.header_row,
            col as u32,
            Cell::text(column.spec.label.as_str(), CellStyle::header()),
        );
    }

    for (offset, row) in table.rows.iter().enumerate() {
        let row_idx = FIRST_DATA_ROW + offset as u32;
        for (col, (cell, column)) in row.cells.iter().zip(&table.columns).enumerate() {
            sheet.set(row_idx, col as u32, data_cell(cell, column));
        }
    }

    if let (Some(totals_row), Some((first, last))) = (plan.totals_row, plan.data_rows) {
        for (col, column) in table.columns.iter().enumerate() {
            sheet.set(totals_row, col as u32, total_cell(column, col as u32, first, last));
        }
        if let Some(first_column) = table.columns.first()
            && !first_column.spec.summed
        {
            sheet.set(totals_row, 0, Cell::text(TOTAL_LABEL, CellStyle::total(None)));
        }
    }

    sheet.set(
        plan.footer_row,
        0,
        Cell::text(
            format!("{FOOTER_PREFIX} {}", heading.extracted_at),
            CellStyle::footer(),
        ),
    );

    for (col, column) in table.columns.iter().enumerate() {
        sheet.set_column_width(col as u32, column_width(table, col, column) as f64);
    }

    debug!(
        sheet = name,
        rows = table.rows.len(),
        columns = table.columns.len(),
        footer_row = plan.footer_row,
        "laid out sheet"
    );
    sheet
}

fn number_style(column: &TypedColumn) -> Option<String> {
    column
        .spec
        .role
        .is_numeric()
        .then(|| column.format.number_format())
}

fn data_cell(cell: &TypedCell, column: &TypedColumn) -> Cell {
    match cell {
        TypedCell::Empty => Cell::blank(CellStyle::data(number_style(column))),
        TypedCell::Text(text) => Cell::text(text.as_str(), CellStyle::data(None)),
        TypedCell::Number(value) => Cell::number(*value, CellStyle::data(number_style(column))),
    }
}

fn total_cell(column: &TypedColumn, col: u32, first_row: u32, last_row: u32) -> Cell {
    let Some(total) = column.total else {
        return Cell::blank(CellStyle::total(None));
    };
    let letter = column_letter(col);
    Cell::new(
        CellValue::Formula {
            expr: format!("SUM({letter}{first_row}:{letter}{last_row})"),
            cached: Some(total),
        },
        CellStyle::total(number_style(column)),
    )
}

/// Widest rendered content plus padding, clamped to the allowed range.
fn column_width(table: &TypedTable, col: usize, column: &TypedColumn) -> usize {
    let header = column.spec.label.as_str().chars().count();
    let content = table
        .rows
        .iter()
        .filter_map(|row| row.cells.get(col))
        .map(|cell| cell_width(cell, &column.format))
        .max()
        .unwrap_or(0);
    let total = column
        .total
        .map(|value| number_width(value, &column.format))
        .unwrap_or(0);
    let min = if column.spec.role == ColumnRole::DayMarker {
        MIN_DAY_COLUMN_WIDTH
    } else {
        MIN_COLUMN_WIDTH
    };
    (header.max(content).max(total) + COLUMN_PADDING).clamp(min, MAX_COLUMN_WIDTH)
}

fn cell_width(cell: &TypedCell, format: &ColumnFormat) -> usize {
    match cell {
        TypedCell::Empty => 0,
        TypedCell::Text(text) => text.chars().count(),
        TypedCell::Number(value) => number_width(*value, format),
    }
}

/// Characters a number occupies once displayed with the column format.
fn number_width(value: Decimal, format: &ColumnFormat) -> usize {
    let rounded = value.round_dp(format.decimals).abs();
    let text = format!("{:.*}", format.decimals as usize, rounded);
    let integer_digits = text.split('.').next().map_or(0, str::len);
    let separators = if format.grouping {
        integer_digits.saturating_sub(1) / 3
    } else {
        0
    };
    let sign = usize::from(value.is_sign_negative() && !value.is_zero());
    text.len() + separators + sign
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_model::{ColumnLabel, Record, SheetSchema};
    use ark_transform::type_records;

    fn record(row: usize, pairs: &[(&str, &str)]) -> Record {
        Record::new(
            row,
            pairs
                .iter()
                .map(|(label, value)| (ColumnLabel::new(*label), (*value).to_string()))
                .collect(),
        )
    }

    fn heading() -> SheetHeading {
        SheetHeading {
            title: None,
            subtitle: None,
            extracted_at: "01-02-2024 10:15".to_string(),
        }
    }

    fn text_at(sheet: &Worksheet, row: u32, col: u32) -> Option<&str> {
        match sheet.cell(row, col).map(|cell| &cell.value) {
            Some(CellValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    #[test]
    fn test_detail_sheet_with_days() {
        let schema = SheetSchema::detail().with_day_columns(&[1, 2, 15]);
        let records = vec![record(1, &[("Øko-ID", "100"), ("I alt, kr", "1.234,50")])];
        let table = type_records(&records, &schema);
        let sheet = emit_sheet(&table, &heading());

        assert_eq!(sheet.name(), "Detaljeret oversigt");
        assert_eq!(sheet.row(HEADER_ROW).count(), 26);
        assert_eq!(text_at(&sheet, HEADER_ROW, 25), Some("15"));

        let total_col = table.column_index("I alt, kr").unwrap() as u32;
        let data = sheet.cell(5, total_col).unwrap();
        assert_eq!(data.value, CellValue::Number(Decimal::new(123450, 2)));
        assert_eq!(data.style.number_format.as_deref(), Some("#,##0.00"));
        assert_eq!(text_at(&sheet, 5, 0), Some("100"));

        let total = sheet.cell(6, total_col).unwrap();
        assert_eq!(
            total.value,
            CellValue::Formula {
                expr: "SUM(V5:V5)".to_string(),
                cached: Some(Decimal::new(123450, 2)),
            }
        );
        assert_eq!(text_at(&sheet, 6, 0), Some(TOTAL_LABEL));
        assert_eq!(text_at(&sheet, 8, 0), Some("Data udtrukket: 01-02-2024 10:15"));
        assert_eq!(sheet.last_row(), 8);
    }

    #[test]
    fn test_empty_document_has_no_totals_row() {
        let table = type_records(&[], &SheetSchema::summary());
        let sheet = emit_sheet(&table, &heading());

        assert_eq!(text_at(&sheet, TITLE_ROW, 0), Some("SAP"));
        assert_eq!(sheet.row(HEADER_ROW).count(), 10);
        assert_eq!(sheet.row(5).count(), 0);
        assert_eq!(sheet.row(6).count(), 0);
        assert_eq!(text_at(&sheet, 7, 0), Some("Data udtrukket: 01-02-2024 10:15"));
        assert_eq!(sheet.last_row(), 7);
    }

    #[test]
    fn test_row_plan() {
        let empty = RowPlan::for_rows(0);
        assert_eq!(empty.totals_row, None);
        assert_eq!(empty.footer_row, 7);

        let three = RowPlan::for_rows(3);
        assert_eq!(three.data_rows, Some((5, 7)));
        assert_eq!(three.totals_row, Some(8));
        assert_eq!(three.footer_row, 10);
    }

    #[test]
    fn test_title_and_subtitle_are_merged() {
        let table = type_records(&[], &SheetSchema::summary());
        let heading = SheetHeading {
            title: Some("Periode 01-01-2024 31-01-2024".to_string()),
            subtitle: Some("Skole A".to_string()),
            extracted_at: "nu".to_string(),
        };
        let sheet = emit_sheet(&table, &heading);
        assert_eq!(text_at(&sheet, 1, 0), Some("Periode 01-01-2024 31-01-2024"));
        assert_eq!(text_at(&sheet, 2, 0), Some("Skole A"));
        let merges: Vec<String> = sheet.merges().iter().map(MergedRange::reference).collect();
        assert_eq!(merges, vec!["A1:J1", "A2:J2"]);
    }

    #[test]
    fn test_unparsable_cells_stay_text_and_out_of_totals() {
        let records = vec![
            record(1, &[("Beløb, kr", "100,25")]),
            record(2, &[("Beløb, kr", "ukendt")]),
        ];
        let table = type_records(&records, &SheetSchema::summary());
        let sheet = emit_sheet(&table, &heading());
        let col = table.column_index("Beløb, kr").unwrap() as u32;

        assert_eq!(text_at(&sheet, 6, col), Some("ukendt"));
        assert_eq!(sheet.cell(6, col).unwrap().style.number_format, None);
        match &sheet.cell(7, col).unwrap().value {
            CellValue::Formula { expr, cached } => {
                assert_eq!(expr, "SUM(I5:I6)");
                assert_eq!(*cached, Some(Decimal::new(10025, 2)));
            }
            other => panic!("expected formula, got {other:?}"),
        }
    }

    #[test]
    fn test_column_widths_are_clamped() {
        let long = "x".repeat(80);
        let schema = SheetSchema::detail().with_day_columns(&[3]);
        let records = vec![record(1, &[("Varetekst", long.as_str()), ("3", "F")])];
        let table = type_records(&records, &schema);
        let sheet = emit_sheet(&table, &heading());

        let varetekst = table.column_index("Varetekst").unwrap() as u32;
        let day = table.column_index("3").unwrap() as u32;
        let enhed = table.column_index("Enhed").unwrap() as u32;
        assert_eq!(sheet.column_width(varetekst), Some(60.0));
        assert_eq!(sheet.column_width(day), Some(5.0));
        assert_eq!(sheet.column_width(enhed), Some(7.0));
    }

    #[test]
    fn test_number_width_counts_grouping() {
        let format = ColumnFormat::new(2, true);
        assert_eq!(number_width(Decimal::new(123450, 2), &format), 8);
        assert_eq!(number_width(Decimal::new(-123450, 2), &format), 9);
        assert_eq!(number_width(Decimal::new(5, 0), &ColumnFormat::new(0, false)), 1);
    }
}
