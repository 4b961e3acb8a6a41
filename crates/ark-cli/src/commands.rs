use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use ark_cli::error::CliError;
use ark_cli::pipeline::{Conversion, DEFAULT_FILE_NAME, PipelineOptions, convert_documents};
use ark_cli::server::{ServerConfig, serve};
use ark_ingest::decode_text;
use tracing::{info, info_span};

use crate::cli::{ConvertArgs, ServeArgs};

pub fn run_convert(args: &ConvertArgs) -> Result<(Conversion, PathBuf)> {
    let span = info_span!("convert", detail = %args.detail.display(), summary = %args.summary.display());
    let _guard = span.enter();

    let detail = read_document(&args.detail)?;
    let summary = read_document(&args.summary)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME));
    let options = PipelineOptions {
        extracted_at: args.extracted_at.clone(),
        file_name: None,
    };
    let conversion =
        convert_documents(&detail, &summary, &options).context("convert documents")?;
    conversion
        .write_to(&output)
        .with_context(|| format!("write {}", output.display()))?;
    Ok((conversion, output))
}

pub fn run_serve(args: &ServeArgs) -> Result<()> {
    let config = ServerConfig {
        bind: args.bind.clone(),
        fetch_timeout: Duration::from_secs(args.fetch_timeout_secs),
        max_body_bytes: args.max_body_bytes,
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    info!(bind = %config.bind, "starting server");
    runtime.block_on(serve(config)).context("serve")
}

fn read_document(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_text(&bytes))
}
