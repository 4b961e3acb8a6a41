//! Error types for workbook output.

use thiserror::Error;

/// Errors that can occur when building or serializing a workbook.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Sheet name breaks the spreadsheet naming rules.
    #[error("invalid sheet name '{name}': {reason}")]
    InvalidSheetName { name: String, reason: &'static str },

    /// Two sheets share a name (compared case-insensitively).
    #[error("duplicate sheet name '{name}'")]
    DuplicateSheetName { name: String },

    /// Workbook has no sheets to write.
    #[error("workbook has no sheets")]
    EmptyWorkbook,

    /// XML part could not be written.
    #[error("failed to write {part}: {message}")]
    Xml { part: String, message: String },

    /// Package container could not be written.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OutputError::InvalidSheetName {
            name: "a/b".to_string(),
            reason: "contains a forbidden character",
        };
        assert_eq!(
            err.to_string(),
            "invalid sheet name 'a/b': contains a forbidden character"
        );
    }
}
