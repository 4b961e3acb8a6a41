//! Console summary of a conversion.

use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::pipeline::{Conversion, DocumentReport};

pub fn print_summary(conversion: &Conversion, output: &Path) {
    println!("Output: {}", output.display());
    println!("Extracted: {}", conversion.extracted_at);
    println!("{}", document_table(conversion));
    println!("{}", column_table(conversion));
}

/// One row per sheet: detection result and row counts.
pub fn document_table(conversion: &Conversion) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Delimiter"),
        header_cell("Header row"),
        header_cell("Matched"),
        header_cell("Rows"),
        header_cell("Dropped"),
        header_cell("Unparsed"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for report in [&conversion.detail, &conversion.summary] {
        let confidence = report.shape.confidence;
        let matched = format!("{}/{}", confidence.matched, confidence.expected);
        let matched_cell = if confidence.is_fallback() {
            Cell::new(matched).fg(Color::Yellow)
        } else {
            Cell::new(matched)
        };
        table.add_row(vec![
            Cell::new(report.kind).add_attribute(Attribute::Bold),
            Cell::new(report.shape.delimiter),
            Cell::new(report.shape.header_row_index + 1),
            matched_cell,
            Cell::new(report.rows),
            dim_or_plain(report.dropped_rows),
            count_cell(report.parse_failures(), Color::Red),
        ]);
    }
    table
}

/// Numeric columns: chosen format and total.
pub fn column_table(conversion: &Conversion) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Column"),
        header_cell("Format"),
        header_cell("Total"),
        header_cell("Unparsed"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    add_column_rows(&mut table, &conversion.detail);
    add_column_rows(&mut table, &conversion.summary);
    table
}

fn add_column_rows(table: &mut Table, report: &DocumentReport) {
    for column in &report.columns {
        let Some(format) = column.number_format.as_deref() else {
            continue;
        };
        let total = column
            .total
            .map_or_else(|| dim_cell("-"), Cell::new);
        table.add_row(vec![
            Cell::new(report.kind),
            Cell::new(&column.label),
            Cell::new(format),
            total,
            count_cell(column.failed, Color::Red),
        ]);
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_or_plain(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
