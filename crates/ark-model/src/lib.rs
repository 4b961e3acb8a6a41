//! Data model for the CSV to spreadsheet conversion pipeline.
//!
//! Every type in this crate is request-scoped: it is created while one
//! pair of documents is converted and dropped when the response is sent.
//!
//! # Overview
//!
//! - **Numbers**: [`ParsedNumber`] is the canonical result of resolving a
//!   locale-ambiguous numeric token.
//! - **Labels**: [`ColumnLabel`] is the join key between declared schema
//!   names and header text observed in the input.
//! - **Schemas**: [`SheetSchema`] declares the columns and [`ColumnRole`]s of
//!   the two supported documents.
//! - **Shape**: [`ShapeDescriptor`] records the inferred delimiter, header
//!   position and optional title/subtitle lines.
//! - **Records**: [`Record`] holds one normalized data row.

pub mod format;
pub mod label;
pub mod number;
pub mod record;
pub mod schema;
pub mod shape;

pub use format::ColumnFormat;
pub use label::ColumnLabel;
pub use number::ParsedNumber;
pub use record::Record;
pub use schema::{
    ColumnRole, ColumnSpec, DETAIL_SHEET_NAME, SUMMARY_SHEET_NAME, SheetKind, SheetSchema,
    day_number,
};
pub use shape::{Delimiter, DetectionConfidence, ShapeDescriptor};
