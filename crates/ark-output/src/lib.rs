//! Sheet layout and spreadsheet output.
//!
//! This crate provides the output side of the pipeline:
//!
//! - **Layout**: places typed tables on worksheets (title, header, data,
//!   totals and footer rows, merged title cells, column widths)
//! - **Workbook model**: cells, styles, merges and widths, independent of
//!   any file format
//! - **XLSX**: serializes the model as an Office Open XML package with
//!   inline strings and a deduplicated style table

mod error;
mod layout;
mod styles;
mod workbook;
mod xlsx;
mod xml;

// === Error Types ===
pub use error::{OutputError, Result};

// === Layout ===
pub use layout::{
    FIRST_DATA_ROW, FOOTER_PREFIX, HEADER_ROW, RowPlan, SUBTITLE_ROW, SheetHeading, TITLE_ROW,
    TOTAL_LABEL, emit_sheet,
};

// === Workbook Model ===
pub use workbook::{
    Cell, CellStyle, CellValue, FontStyle, MAX_SHEET_NAME_LEN, MergedRange, Workbook, Worksheet,
    cell_ref, column_letter, validate_sheet_name,
};

// === Serialization ===
pub use styles::StyleRegistry;
pub use xlsx::{XLSX_CONTENT_TYPE, to_xlsx_bytes, write_xlsx, write_xlsx_file};
