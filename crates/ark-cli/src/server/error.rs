//! Error responses of the HTTP transport.

use ark_ingest::IngestError;
use axum::Json;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::http::header::InvalidHeaderValue;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::error::CliError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not a valid conversion request.
    #[error("{message}")]
    MalformedBody { message: String, trace: Vec<String> },

    /// An input document could not be fetched.
    #[error(transparent)]
    Retrieval(IngestError),

    #[error(transparent)]
    Conversion(CliError),

    #[error("conversion task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Body could not be read, typically because it exceeds the size limit.
    #[error("{0}")]
    Body(#[from] BytesRejection),

    #[error("invalid response header: {0}")]
    Header(#[from] InvalidHeaderValue),
}

impl ApiError {
    pub fn malformed(message: impl Into<String>, trace: Vec<String>) -> Self {
        ApiError::MalformedBody {
            message: message.into(),
            trace,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody { .. } => StatusCode::BAD_REQUEST,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Retrieval(_) => StatusCode::BAD_GATEWAY,
            ApiError::Conversion(err) if err.is_retrieval() => StatusCode::BAD_GATEWAY,
            ApiError::Conversion(_) | ApiError::Task(_) | ApiError::Header(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        if err.is_invalid_source() {
            let message = err.to_string();
            ApiError::malformed(message.clone(), vec![message])
        } else if err.is_retrieval() {
            ApiError::Retrieval(err)
        } else {
            ApiError::Conversion(CliError::Ingest(err))
        }
    }
}

impl From<CliError> for ApiError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Ingest(inner) => inner.into(),
            other => ApiError::Conversion(other),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let trace = match self {
            ApiError::MalformedBody { trace, .. } => {
                warn!(error = %message, "rejected request body");
                Some(trace)
            }
            ApiError::Body(_) => {
                warn!(status = status.as_u16(), error = %message, "unreadable request body");
                None
            }
            _ => {
                error!(status = status.as_u16(), error = %message, "conversion failed");
                None
            }
        };
        (
            status,
            Json(ErrorBody {
                error: message,
                trace,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::malformed("x", Vec::new()).status(),
            StatusCode::BAD_REQUEST
        );
        let fetch = IngestError::Status {
            url: "https://example.com".to_string(),
            status: 404,
        };
        assert_eq!(ApiError::from(fetch).status(), StatusCode::BAD_GATEWAY);

        let header = IngestError::InvalidHeader {
            name: "bad header".to_string(),
            reason: "invalid HTTP header name".to_string(),
        };
        assert_eq!(ApiError::from(header).status(), StatusCode::BAD_REQUEST);

        let output = CliError::Output(ark_output::OutputError::EmptyWorkbook);
        assert_eq!(
            ApiError::from(output).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
