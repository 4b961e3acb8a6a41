//! HTTP transport: accepts two document sources, returns the workbook.

mod error;
mod request;

use std::net::SocketAddr;
use std::time::Duration;

use ark_ingest::SourceFetcher;
use ark_output::XLSX_CONTENT_TYPE;
use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{CliError, Result};
use crate::pipeline::{convert_documents, output_file_name};

pub use error::ApiError;
pub use request::{ConvertRequest, DocumentSource};

/// Default listen address.
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Default request body cap (16 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Default timeout for fetching one remote document.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub fetch_timeout: Duration,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Shared handler state. Holds no per-request data.
#[derive(Debug, Clone)]
pub struct AppState {
    fetcher: SourceFetcher,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        Ok(Self {
            fetcher: SourceFetcher::new(config.fetch_timeout)?,
        })
    }
}

/// Routes: conversion on `POST /` and `POST /convert`, `GET /health`.
///
/// Other methods on the conversion routes get 405 from the router.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", post(convert))
        .route("/convert", post(convert))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = AppState::new(&config)?;
    let app = router(state, config.max_body_bytes);
    let listener = TcpListener::bind(&config.bind)
        .await
        .map_err(|source| CliError::Bind {
            addr: config.bind.clone(),
            source,
        })?;
    let local: Option<SocketAddr> = listener.local_addr().ok();
    info!(
        addr = ?local,
        fetch_timeout_secs = config.fetch_timeout.as_secs(),
        max_body_bytes = config.max_body_bytes,
        "listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(CliError::Server)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn convert(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> std::result::Result<Response, ApiError> {
    let request = ConvertRequest::from_json(&body?)?;
    let (detail_source, summary_source) = request.sources()?;
    let options = request.options();

    let (detail_text, summary_text) = tokio::try_join!(
        state.fetcher.fetch(&detail_source),
        state.fetcher.fetch(&summary_source)
    )?;

    let file_name = output_file_name(options.file_name.as_deref());
    let (bytes, detail_rows, summary_rows) = tokio::task::spawn_blocking(move || {
        let conversion = convert_documents(&detail_text, &summary_text, &options)?;
        let bytes = conversion.to_xlsx()?;
        Ok::<_, CliError>((bytes, conversion.detail.rows, conversion.summary.rows))
    })
    .await??;

    info!(
        detail = %detail_source.describe(),
        summary = %summary_source.describe(),
        detail_rows,
        summary_rows,
        bytes = bytes.len(),
        file_name = %file_name,
        "served conversion"
    );
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
