//! Error types for document ingestion.

use thiserror::Error;

/// Errors that can occur while acquiring or splitting input documents.
///
/// Detection and normalization never fail: an ambiguous shape falls back to
/// defaults instead of producing an error.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Input Source Errors ===
    /// Location could not be parsed as a URL.
    #[error("invalid source URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Only http and https locations can be fetched.
    #[error("unsupported URL scheme '{scheme}' in {url}")]
    UnsupportedScheme { url: String, scheme: String },

    /// Request header supplied with a source is not valid HTTP.
    #[error("invalid request header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// Remote source did not answer in time.
    #[error("timed out fetching {url}")]
    Timeout { url: String },

    /// Remote source could not be reached.
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Remote source answered with a non-success status.
    #[error("fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    // === CSV Parsing Errors ===
    /// Failed to split a line into fields.
    #[error("failed to read CSV line {line}: {source}")]
    CsvParse {
        line: usize,
        #[source]
        source: ::csv::Error,
    },
}

impl IngestError {
    /// True for failures to acquire the input text from a reachable location.
    pub fn is_retrieval(&self) -> bool {
        matches!(
            self,
            IngestError::Timeout { .. } | IngestError::Fetch { .. } | IngestError::Status { .. }
        )
    }

    /// True when the caller described the source badly (URL, scheme or header).
    pub fn is_invalid_source(&self) -> bool {
        matches!(
            self,
            IngestError::InvalidUrl { .. }
                | IngestError::UnsupportedScheme { .. }
                | IngestError::InvalidHeader { .. }
        )
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::Status {
            url: "https://example.com/a.csv".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "fetching https://example.com/a.csv returned HTTP 404"
        );
        assert!(err.is_retrieval());
        assert!(!err.is_invalid_source());
    }

    #[test]
    fn test_invalid_url_keeps_source() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err = IngestError::InvalidUrl {
            url: "not a url".to_string(),
            source: parse_err,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
