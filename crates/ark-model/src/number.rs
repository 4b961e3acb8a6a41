//! Canonical numeric values resolved from locale-formatted text.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A numeric token resolved to one canonical value.
///
/// `decimal_digits` is the number of digits that followed the recognized
/// decimal separator in the source token. `grouping_observed` is true when a
/// grouping separator was recognized and stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedNumber {
    pub value: Decimal,
    pub decimal_digits: u32,
    pub grouping_observed: bool,
}

impl ParsedNumber {
    pub fn new(value: Decimal, decimal_digits: u32, grouping_observed: bool) -> Self {
        Self {
            value,
            decimal_digits,
            grouping_observed,
        }
    }

    /// Plain integer without separators.
    pub fn integer(value: i64) -> Self {
        Self::new(Decimal::from(value), 0, false)
    }

    /// Canonical text with a `.` decimal point and no grouping.
    pub fn format_canonical(&self) -> String {
        self.value.to_string()
    }
}
