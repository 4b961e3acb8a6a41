use std::io::{Cursor, Read};

use ark_model::{ColumnLabel, Record, SheetSchema};
use ark_output::{
    Cell, CellStyle, SheetHeading, Workbook, Worksheet, emit_sheet, to_xlsx_bytes, write_xlsx_file,
};
use ark_transform::type_records;
use rust_decimal::Decimal;
use zip::ZipArchive;

fn record(row: usize, pairs: &[(&str, &str)]) -> Record {
    Record::new(
        row,
        pairs
            .iter()
            .map(|(label, value)| (ColumnLabel::new(*label), (*value).to_string()))
            .collect(),
    )
}

fn sample_workbook() -> Workbook {
    let heading = SheetHeading {
        title: Some("Periode 01-01-2024 31-01-2024".to_string()),
        subtitle: None,
        extracted_at: "01-02-2024 10:15".to_string(),
    };
    let detail = type_records(
        &[record(4, &[("Øko-ID", "100"), ("I alt, kr", "1.234,50"), ("1", "F")])],
        &SheetSchema::detail().with_day_columns(&[1, 2, 15]),
    );
    let summary = type_records(
        &[
            record(1, &[("Tekst", "Kaffe & te"), ("Beløb, kr", "25,00")]),
            record(2, &[("Tekst", "Mælk"), ("Beløb, kr", "1.000,125")]),
        ],
        &SheetSchema::summary(),
    );

    let mut workbook = Workbook::new();
    workbook
        .add_sheet(emit_sheet(&detail, &heading))
        .expect("detail sheet");
    workbook
        .add_sheet(emit_sheet(&summary, &SheetHeading::default()))
        .expect("summary sheet");
    workbook
}

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("open package");
    let mut part = archive.by_name(name).expect("part present");
    let mut text = String::new();
    part.read_to_string(&mut text).expect("read part");
    text
}

#[test]
fn package_contains_all_parts() {
    let bytes = to_xlsx_bytes(&sample_workbook()).expect("serialize");
    let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).expect("open package");
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec![
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/app.xml",
            "docProps/core.xml",
            "xl/_rels/workbook.xml.rels",
            "xl/styles.xml",
            "xl/workbook.xml",
            "xl/worksheets/sheet1.xml",
            "xl/worksheets/sheet2.xml",
        ]
    );
}

#[test]
fn workbook_lists_both_sheets_in_order() {
    let bytes = to_xlsx_bytes(&sample_workbook()).expect("serialize");
    let workbook = read_part(&bytes, "xl/workbook.xml");
    let detail = workbook.find(r#"name="Detaljeret oversigt""#).expect("detail");
    let summary = workbook.find(r#"name="SAP""#).expect("summary");
    assert!(detail < summary);

    let types = read_part(&bytes, "[Content_Types].xml");
    assert!(types.contains("/xl/worksheets/sheet2.xml"));
}

#[test]
fn detail_sheet_has_totals_formula_and_footer() {
    let bytes = to_xlsx_bytes(&sample_workbook()).expect("serialize");
    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("<f>SUM(V5:V5)</f><v>1234.50</v>"));
    assert!(sheet.contains("<t>Periode 01-01-2024 31-01-2024</t>"));
    assert!(sheet.contains("<t>Data udtrukket: 01-02-2024 10:15</t>"));
    assert!(sheet.contains(r#"<mergeCell ref="A1:Z1"/>"#));
    assert!(sheet.contains(r#"<row r="8">"#));
}

#[test]
fn summary_sheet_escapes_text_and_widens_precision() {
    let bytes = to_xlsx_bytes(&sample_workbook()).expect("serialize");
    let sheet = read_part(&bytes, "xl/worksheets/sheet2.xml");
    assert!(sheet.contains("<t>Kaffe &amp; te</t>"));
    assert!(sheet.contains("<f>SUM(I5:I6)</f><v>1025.125</v>"));
    assert!(sheet.contains("<t>SAP</t>"));

    let styles = read_part(&bytes, "xl/styles.xml");
    assert!(styles.contains(r##"formatCode="#,##0.000""##));
}

#[test]
fn writes_package_to_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("oversigt.xlsx");
    write_xlsx_file(&sample_workbook(), &path).expect("write file");
    let bytes = std::fs::read(&path).expect("read back");
    assert!(bytes.starts_with(b"PK"));
    assert!(read_part(&bytes, "docProps/app.xml").contains("<vt:lpstr>SAP</vt:lpstr>"));
}

#[test]
fn control_characters_are_encoded_in_cell_text() {
    let summary = type_records(
        &[record(1, &[("Tekst", "Kaffe\u{1}"), ("Beløb, kr", "25,00")])],
        &SheetSchema::summary(),
    );
    let mut workbook = Workbook::new();
    workbook
        .add_sheet(emit_sheet(&summary, &SheetHeading::default()))
        .expect("summary sheet");
    let bytes = to_xlsx_bytes(&workbook).expect("serialize");
    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
    assert!(!sheet.contains('\u{1}'));
    assert!(sheet.contains("<t>Kaffe_x0001_</t>"));
}

#[test]
fn worksheet_part_snapshot() {
    let mut sheet = Worksheet::new("SAP");
    sheet.set(1, 0, Cell::text("Kaffe\u{1}", CellStyle::default()));
    sheet.set(1, 1, Cell::number(Decimal::new(1250, 2), CellStyle::default()));
    sheet.set(2, 0, Cell::text(" kode_x0041_ ", CellStyle::default()));
    let mut workbook = Workbook::new();
    workbook.add_sheet(sheet).expect("sheet");
    let bytes = to_xlsx_bytes(&workbook).expect("serialize");
    insta::assert_snapshot!(
        read_part(&bytes, "xl/worksheets/sheet1.xml"),
        @r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>Kaffe_x0001_</t></is></c><c r="B1"><v>12.50</v></c></row><row r="2"><c r="A2" t="inlineStr"><is><t xml:space="preserve"> kode_x005F_x0041_ </t></is></c></row></sheetData></worksheet>"#
    );
}
