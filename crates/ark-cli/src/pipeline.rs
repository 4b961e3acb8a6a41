//! Conversion pipeline shared by the command line and the HTTP server.
//!
//! Each document runs through ingestion, typing and layout on its own;
//! the two resulting sheets are then combined into one workbook (detail
//! first, summary second). The pipeline does no I/O besides the optional
//! file write at the end.

use std::path::Path;

use ark_ingest::ingest_document;
use ark_model::{ColumnRole, ShapeDescriptor, SheetKind};
use ark_output::{SheetHeading, Workbook, Worksheet, emit_sheet, to_xlsx_bytes, write_xlsx_file};
use ark_transform::{TypedTable, type_records};
use chrono::Local;
use rust_decimal::Decimal;
use tracing::info;

use crate::error::Result;

/// File name used when a request does not name one.
pub const DEFAULT_FILE_NAME: &str = "oversigt.xlsx";

/// Format of the default extraction timestamp in the footer.
pub const EXTRACTED_AT_FORMAT: &str = "%d-%m-%Y %H:%M";

/// Per-conversion options.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Footer timestamp, shown verbatim. Defaults to the local time.
    pub extracted_at: Option<String>,
    /// Download name for the workbook.
    pub file_name: Option<String>,
}

/// Outcome for one column, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnReport {
    pub label: String,
    pub role: ColumnRole,
    /// Number format of numeric columns.
    pub number_format: Option<String>,
    pub total: Option<Decimal>,
    pub parsed: usize,
    pub failed: usize,
}

/// Outcome for one document.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub kind: SheetKind,
    pub shape: ShapeDescriptor,
    pub rows: usize,
    pub dropped_rows: usize,
    pub columns: Vec<ColumnReport>,
}

impl DocumentReport {
    fn new(shape: ShapeDescriptor, dropped_rows: usize, table: &TypedTable) -> Self {
        let columns = table
            .columns
            .iter()
            .map(|column| ColumnReport {
                label: column.spec.label.as_str().to_string(),
                role: column.spec.role,
                number_format: column
                    .spec
                    .role
                    .is_numeric()
                    .then(|| column.format.number_format()),
                total: column.total,
                parsed: column.stats.parsed,
                failed: column.stats.failed,
            })
            .collect();
        Self {
            kind: table.kind,
            shape,
            rows: table.rows.len(),
            dropped_rows,
            columns,
        }
    }

    /// Numeric cells kept as text across all columns.
    pub fn parse_failures(&self) -> usize {
        self.columns.iter().map(|column| column.failed).sum()
    }

    pub fn column(&self, label: &str) -> Option<&ColumnReport> {
        self.columns.iter().find(|column| column.label == label)
    }
}

/// A finished conversion: the workbook plus what was learned on the way.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub workbook: Workbook,
    pub detail: DocumentReport,
    pub summary: DocumentReport,
    pub extracted_at: String,
}

impl Conversion {
    pub fn to_xlsx(&self) -> Result<Vec<u8>> {
        Ok(to_xlsx_bytes(&self.workbook)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        write_xlsx_file(&self.workbook, path)?;
        info!(path = %path.display(), "wrote workbook");
        Ok(())
    }
}

/// Run one document through ingestion, typing and layout.
pub fn process_document(
    text: &str,
    kind: SheetKind,
    extracted_at: &str,
) -> Result<(Worksheet, DocumentReport)> {
    let document = ingest_document(text, kind)?;
    let table = type_records(&document.records, &document.schema);
    let heading = SheetHeading {
        title: document.shape.title.clone(),
        subtitle: document.shape.subtitle.clone(),
        extracted_at: extracted_at.to_string(),
    };
    let sheet = emit_sheet(&table, &heading);
    let report = DocumentReport::new(document.shape, document.dropped_rows, &table);
    Ok((sheet, report))
}

/// Convert the detail and summary documents into one workbook.
pub fn convert_documents(
    detail_text: &str,
    summary_text: &str,
    options: &PipelineOptions,
) -> Result<Conversion> {
    let extracted_at = options
        .extracted_at
        .clone()
        .unwrap_or_else(default_extracted_at);

    let (detail_sheet, detail) = process_document(detail_text, SheetKind::Detail, &extracted_at)?;
    let (summary_sheet, summary) =
        process_document(summary_text, SheetKind::Summary, &extracted_at)?;

    let mut workbook = Workbook::new();
    workbook.add_sheet(detail_sheet)?;
    workbook.add_sheet(summary_sheet)?;

    info!(
        detail_rows = detail.rows,
        summary_rows = summary.rows,
        detail_failures = detail.parse_failures(),
        summary_failures = summary.parse_failures(),
        "converted documents"
    );
    Ok(Conversion {
        workbook,
        detail,
        summary,
        extracted_at,
    })
}

/// Local time in the footer format.
pub fn default_extracted_at() -> String {
    Local::now().format(EXTRACTED_AT_FORMAT).to_string()
}

/// Download name: the requested name made header-safe, with `.xlsx`
/// appended when missing.
pub fn output_file_name(requested: Option<&str>) -> String {
    let cleaned: String = requested
        .unwrap_or_default()
        .trim()
        .chars()
        .map(|ch| {
            if ch == ' ' || (ch.is_ascii_graphic() && !matches!(ch, '"' | '\\' | '/')) {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return DEFAULT_FILE_NAME.to_string();
    }
    if cleaned.to_ascii_lowercase().ends_with(".xlsx") {
        cleaned.to_string()
    } else {
        format!("{cleaned}.xlsx")
    }
}
