//! CLI argument definitions for `order-cleaner`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::Level;

use crate::pipeline::PipelineConfig;

#[derive(Debug, Parser)]
#[command(
    name = "order-cleaner",
    version,
    about = "Clean and validate an order dataset (CSV or XLSX)",
    long_about = "Clean and validate an order dataset.\n\n\
                  Normalizes columns and values, resolves duplicate order ids, drops incomplete \
                  rows, validates the result and writes the cleaned table plus report.json and \
                  report.md.\n\n\
                  Exit codes: 0 success, 1 I/O failure, 2 validation failed with --strict."
)]
pub struct Cli {
    /// Input CSV or XLSX file.
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output CSV or XLSX file.
    #[arg(long, value_name = "PATH")]
    pub output: PathBuf,

    /// Directory to store reports.
    #[arg(long = "report-dir", value_name = "DIR", default_value = "reports")]
    pub report_dir: PathBuf,

    /// Directory to store logs.
    #[arg(long = "log-dir", value_name = "DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Exit with code 2 on validation errors.
    #[arg(long)]
    pub strict: bool,

    /// Logging level.
    #[arg(
        long = "log-level",
        value_enum,
        ignore_case = true,
        default_value = "INFO"
    )]
    pub log_level: LogLevelArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevelArg {
    #[value(alias = "critical")]
    Error,
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Level::ERROR,
            LogLevelArg::Warn => Level::WARN,
            LogLevelArg::Info => Level::INFO,
            LogLevelArg::Debug => Level::DEBUG,
            LogLevelArg::Trace => Level::TRACE,
        }
    }
}

impl From<Cli> for PipelineConfig {
    fn from(cli: Cli) -> Self {
        PipelineConfig {
            input: cli.input,
            output: cli.output,
            report_dir: cli.report_dir,
            log_dir: cli.log_dir,
            strict: cli.strict,
            log_level: cli.log_level.into(),
        }
    }
}
