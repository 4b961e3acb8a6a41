//! Display format shared by every cell of a column.

use serde::{Deserialize, Serialize};

/// Decimal precision and grouping chosen for one column after all rows
/// have been scanned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnFormat {
    pub decimals: u32,
    pub grouping: bool,
}

impl ColumnFormat {
    pub fn new(decimals: u32, grouping: bool) -> Self {
        Self { decimals, grouping }
    }

    /// Spreadsheet number format code, e.g. `#,##0.00` or `0.000`.
    ///
    /// Format codes use the invariant `,`/`.` symbols; the spreadsheet
    /// application renders them in the reader's locale.
    pub fn number_format(&self) -> String {
        let mut code = String::from(if self.grouping { "#,##0" } else { "0" });
        if self.decimals > 0 {
            code.push('.');
            code.extend(std::iter::repeat_n('0', self.decimals as usize));
        }
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_format_codes() {
        assert_eq!(ColumnFormat::new(0, false).number_format(), "0");
        assert_eq!(ColumnFormat::new(2, false).number_format(), "0.00");
        assert_eq!(ColumnFormat::new(0, true).number_format(), "#,##0");
        assert_eq!(ColumnFormat::new(3, true).number_format(), "#,##0.000");
    }
}
