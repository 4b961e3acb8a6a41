//! CSV reading utilities.

mod reader;

pub use reader::{logical_lines, normalize_cell, split_rows};
