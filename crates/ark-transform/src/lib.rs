//! Column typing for locale-formatted CSV data.
//!
//! Turns normalized records into typed cells with one consistent display
//! format per column.
//!
//! # Overview
//!
//! This crate provides:
//! - **Numeric resolution**: [`resolve`] decides whether a token such as
//!   `"1.234,56"` or `"1,234.56"` is a number and what it is worth
//! - **Column typing**: [`type_records`] applies declared column roles,
//!   accumulates per-column statistics and picks each column's format and total
//!
//! # Example
//!
//! ```ignore
//! use ark_model::SheetSchema;
//! use ark_transform::type_records;
//!
//! let schema = SheetSchema::summary();
//! let table = type_records(&records, &schema);
//! for column in &table.columns {
//!     println!("{} -> {}", column.spec.label, column.format.number_format());
//! }
//! ```
//!
//! # Design Principles
//!
//! - **Lenient**: an unparsable value in a numeric column is kept as text, never zeroed
//! - **Request-scoped**: statistics live in an explicit accumulator, never in shared state
//! - **Order-preserving**: typed rows come out in source order

mod stats;
mod types;
mod typing;

pub mod normalization;

pub use normalization::numeric::{is_numeric, resolve};
pub use stats::{ColumnStats, ColumnStatsSet, PARSE_FAILURE_WARN_RATIO};
pub use types::{TypedCell, TypedColumn, TypedRow, TypedTable};
pub use typing::type_records;
