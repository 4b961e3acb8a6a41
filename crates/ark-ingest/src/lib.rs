//! Document ingestion for locale-formatted CSV exports.
//!
//! This crate turns raw delimited text into ordered records of one of the
//! two known schemas.
//!
//! # Features
//!
//! - **Input sources**: inline text or a remote location fetched over HTTP,
//!   decoded as UTF-8 with a Windows-1252 fallback
//! - **Row splitting**: quote-aware splitting that never drops blank lines
//! - **Shape detection**: delimiter, header row, title and subtitle lines
//! - **Row normalization**: noise-row filtering and label/value zipping
//!
//! # Example
//!
//! ```ignore
//! use ark_ingest::ingest_document;
//! use ark_model::SheetKind;
//!
//! let document = ingest_document(&text, SheetKind::Detail)?;
//! println!("header at row {}", document.shape.header_row_index);
//! for record in &document.records {
//!     println!("{:?}", record.get(&"I alt, kr".into()));
//! }
//! ```

mod csv;
mod document;
mod error;
mod normalize;
mod shape;
mod source;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use crate::csv::{normalize_cell, split_rows};

// === Shape Detection ===
pub use shape::{DetectedShape, SCAN_WINDOW, TITLE_SENTINEL, detect, detect_shape};

// === Row Normalization ===
pub use normalize::{NormalizedRows, TRAILING_SENTINELS, header_labels, is_noise_row, normalize};

// === Documents ===
pub use document::{IngestedDocument, day_columns, ingest_document};

// === Input Sources ===
pub use source::{InputSource, SourceFetcher, decode_text};
