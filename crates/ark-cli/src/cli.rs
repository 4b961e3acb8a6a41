//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ark",
    version,
    about = "Convert Danish-formatted CSV exports into a two-sheet spreadsheet",
    long_about = "Convert a detail export and a SAP summary export into one .xlsx workbook.\n\n\
                  Detects delimiter and header row, parses locale-formatted numbers,\n\
                  and adds totals, formats and an extraction footer."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP conversion service.
    Serve(ServeArgs),

    /// Convert two local CSV files into a workbook.
    Convert(ConvertArgs),
}

#[derive(Parser)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "ARK_BIND", default_value = "0.0.0.0:8080")]
    pub bind: String,

    /// Timeout in seconds for fetching one remote document.
    #[arg(long = "fetch-timeout-secs", env = "ARK_FETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub fetch_timeout_secs: u64,

    /// Largest accepted request body in bytes.
    #[arg(long = "max-body-bytes", env = "ARK_MAX_BODY_BYTES", default_value_t = 16 * 1024 * 1024)]
    pub max_body_bytes: usize,
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Detail export (wide, with day columns).
    #[arg(long, value_name = "CSV")]
    pub detail: PathBuf,

    /// SAP summary export.
    #[arg(long, alias = "sap", value_name = "CSV")]
    pub summary: PathBuf,

    /// Workbook to write (default: ./oversigt.xlsx).
    #[arg(long, short, value_name = "XLSX")]
    pub output: Option<PathBuf>,

    /// Footer timestamp, shown verbatim (default: now, DD-MM-YYYY HH:MM).
    #[arg(long = "extracted-at", value_name = "TEXT")]
    pub extracted_at: Option<String>,

    /// Skip the console summary.
    #[arg(long)]
    pub quiet_summary: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
