//! Errors raised while running a conversion.

use std::path::PathBuf;

use ark_ingest::IngestError;
use ark_output::OutputError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Server(#[source] std::io::Error),
}

impl CliError {
    /// True when the input text could not be acquired.
    pub fn is_retrieval(&self) -> bool {
        matches!(self, CliError::Ingest(err) if err.is_retrieval())
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
