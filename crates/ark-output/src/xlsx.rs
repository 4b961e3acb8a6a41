//! Office Open XML (`.xlsx`) package writer.
//!
//! Writes the minimal set of parts spreadsheet applications need. Strings
//! are stored inline in the sheets, so there is no shared string table.

use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use tracing::debug;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{OutputError, Result};
use crate::styles::StyleRegistry;
use crate::workbook::{CellValue, Workbook, Worksheet, cell_ref};
use crate::xml::{
    PACKAGE_RELATIONSHIP_NS, RELATIONSHIP_NS, SPREADSHEET_NS, XmlWriter, escape_cell_text,
};

/// MIME type of the written package.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const APPLICATION_NAME: &str = "ark";

const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

/// Serialize a workbook into an in-memory `.xlsx` package.
pub fn to_xlsx_bytes(workbook: &Workbook) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_xlsx(workbook, &mut cursor)?;
    Ok(cursor.into_inner())
}

/// Write a workbook as an `.xlsx` file.
pub fn write_xlsx_file(workbook: &Workbook, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_xlsx(workbook, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a workbook as an `.xlsx` package into any seekable writer.
pub fn write_xlsx<W: Write + Seek>(workbook: &Workbook, writer: W) -> Result<()> {
    if workbook.sheets().is_empty() {
        return Err(OutputError::EmptyWorkbook);
    }
    let styles = StyleRegistry::from_workbook(workbook);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(writer);

    let mut parts: Vec<(String, Vec<u8>)> = vec![
        ("[Content_Types].xml".to_string(), content_types_xml(workbook)?),
        ("_rels/.rels".to_string(), root_rels_xml()?),
        ("docProps/core.xml".to_string(), core_xml()?),
        ("docProps/app.xml".to_string(), app_xml(workbook)?),
        ("xl/workbook.xml".to_string(), workbook_xml(workbook)?),
        (
            "xl/_rels/workbook.xml.rels".to_string(),
            workbook_rels_xml(workbook)?,
        ),
        ("xl/styles.xml".to_string(), styles.to_xml()?),
    ];
    for (idx, sheet) in workbook.sheets().iter().enumerate() {
        parts.push((
            format!("xl/worksheets/sheet{}.xml", idx + 1),
            worksheet_xml(sheet, &styles)?,
        ));
    }

    for (name, bytes) in &parts {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(bytes)?;
    }
    zip.finish()?;
    debug!(
        sheets = workbook.sheets().len(),
        styles = styles.len(),
        parts = parts.len(),
        "wrote xlsx package"
    );
    Ok(())
}

fn content_types_xml(workbook: &Workbook) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new("[Content_Types].xml");
    xml.decl()?;
    xml.start("Types", &[("xmlns", CONTENT_TYPES_NS)])?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            (
                "ContentType",
                "application/vnd.openxmlformats-package.relationships+xml",
            ),
        ],
    )?;
    xml.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;

    let mut overrides = vec![
        (
            "/xl/workbook.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml",
        ),
        (
            "/xl/styles.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml",
        ),
        (
            "/docProps/core.xml".to_string(),
            "application/vnd.openxmlformats-package.core-properties+xml",
        ),
        (
            "/docProps/app.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.extended-properties+xml",
        ),
    ];
    for idx in 1..=workbook.sheets().len() {
        overrides.push((
            format!("/xl/worksheets/sheet{idx}.xml"),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml",
        ));
    }
    for (part, content_type) in &overrides {
        xml.empty(
            "Override",
            &[("PartName", part.as_str()), ("ContentType", *content_type)],
        )?;
    }
    xml.end("Types")?;
    Ok(xml.into_inner())
}

fn root_rels_xml() -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new("_rels/.rels");
    xml.decl()?;
    xml.start("Relationships", &[("xmlns", PACKAGE_RELATIONSHIP_NS)])?;
    for (id, kind, target) in [
        ("rId1", REL_OFFICE_DOCUMENT, "xl/workbook.xml"),
        ("rId2", REL_CORE_PROPERTIES, "docProps/core.xml"),
        ("rId3", REL_EXTENDED_PROPERTIES, "docProps/app.xml"),
    ] {
        xml.empty(
            "Relationship",
            &[("Id", id), ("Type", kind), ("Target", target)],
        )?;
    }
    xml.end("Relationships")?;
    Ok(xml.into_inner())
}

fn core_xml() -> Result<Vec<u8>> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut xml = XmlWriter::new("docProps/core.xml");
    xml.decl()?;
    xml.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    xml.text_element("dc:creator", &[], APPLICATION_NAME)?;
    xml.text_element(
        "dcterms:created",
        &[("xsi:type", "dcterms:W3CDTF")],
        &now,
    )?;
    xml.text_element(
        "dcterms:modified",
        &[("xsi:type", "dcterms:W3CDTF")],
        &now,
    )?;
    xml.end("cp:coreProperties")?;
    Ok(xml.into_inner())
}

fn app_xml(workbook: &Workbook) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new("docProps/app.xml");
    xml.decl()?;
    xml.start(
        "Properties",
        &[
            (
                "xmlns",
                "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
            ),
            (
                "xmlns:vt",
                "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes",
            ),
        ],
    )?;
    xml.text_element("Application", &[], APPLICATION_NAME)?;

    let count = workbook.sheets().len().to_string();
    xml.start("TitlesOfParts", &[])?;
    xml.start("vt:vector", &[("size", count.as_str()), ("baseType", "lpstr")])?;
    for sheet in workbook.sheets() {
        xml.text_element("vt:lpstr", &[], sheet.name())?;
    }
    xml.end("vt:vector")?;
    xml.end("TitlesOfParts")?;
    xml.end("Properties")?;
    Ok(xml.into_inner())
}

fn workbook_xml(workbook: &Workbook) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new("xl/workbook.xml");
    xml.decl()?;
    xml.start(
        "workbook",
        &[("xmlns", SPREADSHEET_NS), ("xmlns:r", RELATIONSHIP_NS)],
    )?;
    xml.start("sheets", &[])?;
    for (idx, sheet) in workbook.sheets().iter().enumerate() {
        let sheet_id = (idx + 1).to_string();
        let rel_id = format!("rId{}", idx + 1);
        xml.empty(
            "sheet",
            &[
                ("name", sheet.name()),
                ("sheetId", sheet_id.as_str()),
                ("r:id", rel_id.as_str()),
            ],
        )?;
    }
    xml.end("sheets")?;
    xml.end("workbook")?;
    Ok(xml.into_inner())
}

fn workbook_rels_xml(workbook: &Workbook) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new("xl/_rels/workbook.xml.rels");
    xml.decl()?;
    xml.start("Relationships", &[("xmlns", PACKAGE_RELATIONSHIP_NS)])?;
    let sheet_count = workbook.sheets().len();
    for idx in 1..=sheet_count {
        let id = format!("rId{idx}");
        let target = format!("worksheets/sheet{idx}.xml");
        xml.empty(
            "Relationship",
            &[
                ("Id", id.as_str()),
                ("Type", REL_WORKSHEET),
                ("Target", target.as_str()),
            ],
        )?;
    }
    let styles_id = format!("rId{}", sheet_count + 1);
    xml.empty(
        "Relationship",
        &[
            ("Id", styles_id.as_str()),
            ("Type", REL_STYLES),
            ("Target", "styles.xml"),
        ],
    )?;
    xml.end("Relationships")?;
    Ok(xml.into_inner())
}

fn worksheet_xml(sheet: &Worksheet, styles: &StyleRegistry) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new("xl/worksheets/sheet.xml");
    xml.decl()?;
    xml.start(
        "worksheet",
        &[("xmlns", SPREADSHEET_NS), ("xmlns:r", RELATIONSHIP_NS)],
    )?;

    let widths: Vec<(u32, f64)> = sheet.column_widths().collect();
    if !widths.is_empty() {
        xml.start("cols", &[])?;
        for (col, width) in widths {
            let position = (col + 1).to_string();
            let width = format!("{width:.2}");
            xml.empty(
                "col",
                &[
                    ("min", position.as_str()),
                    ("max", position.as_str()),
                    ("width", width.as_str()),
                    ("customWidth", "1"),
                ],
            )?;
        }
        xml.end("cols")?;
    }

    xml.start("sheetData", &[])?;
    for (row, cells) in sheet.rows() {
        let row_ref = row.to_string();
        xml.start("row", &[("r", row_ref.as_str())])?;
        for (col, cell) in cells {
            let reference = cell_ref(row, *col);
            let style_idx = styles.index_of(&cell.style).to_string();
            let mut attrs = vec![("r", reference.as_str())];
            if style_idx != "0" {
                attrs.push(("s", style_idx.as_str()));
            }
            match &cell.value {
                CellValue::Blank => xml.empty("c", &attrs)?,
                CellValue::Text(text) => {
                    attrs.push(("t", "inlineStr"));
                    xml.start("c", &attrs)?;
                    xml.start("is", &[])?;
                    let text = escape_cell_text(text);
                    if text.trim() != text {
                        xml.text_element("t", &[("xml:space", "preserve")], &text)?;
                    } else {
                        xml.text_element("t", &[], &text)?;
                    }
                    xml.end("is")?;
                    xml.end("c")?;
                }
                CellValue::Number(value) => {
                    xml.start("c", &attrs)?;
                    xml.text_element("v", &[], &value.to_string())?;
                    xml.end("c")?;
                }
                CellValue::Formula { expr, cached } => {
                    xml.start("c", &attrs)?;
                    xml.text_element("f", &[], expr)?;
                    if let Some(cached) = cached {
                        xml.text_element("v", &[], &cached.to_string())?;
                    }
                    xml.end("c")?;
                }
            }
        }
        xml.end("row")?;
    }
    xml.end("sheetData")?;

    if !sheet.merges().is_empty() {
        let count = sheet.merges().len().to_string();
        xml.start("mergeCells", &[("count", count.as_str())])?;
        for range in sheet.merges() {
            let reference = range.reference();
            xml.empty("mergeCell", &[("ref", reference.as_str())])?;
        }
        xml.end("mergeCells")?;
    }

    xml.end("worksheet")?;
    Ok(xml.into_inner())
}
