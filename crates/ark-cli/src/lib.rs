//! Conversion pipeline, HTTP transport and console reporting for `ark`.

pub mod error;
pub mod logging;
pub mod pipeline;
pub mod server;
pub mod summary;

pub use error::{CliError, Result};
pub use pipeline::{Conversion, DocumentReport, PipelineOptions, convert_documents};
