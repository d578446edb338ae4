//! End-to-end run: read, clean, validate, report, write.
//!
//! Only I/O can abort a run. Validation failures are reported and, in strict mode, turned into
//! [`ExitStatus::ValidationFailed`] after the report and the output table have been written.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{Level, error, info, warn};

use crate::cleaning::{CleaningEngine, CleaningOptions, TracingObserver};
use crate::io::{read_table, write_table};
use crate::report::{ReportInputs, build_report, write_report_files};
use crate::validation::SchemaValidator;

/// Everything a single run needs, usually built from [`crate::cli::Cli`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub report_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Turn a failed validation into [`ExitStatus::ValidationFailed`].
    pub strict: bool,
    pub log_level: Level,
}

impl PipelineConfig {
    /// Config with the CLI defaults for everything but the input and output paths.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            report_dir: PathBuf::from("reports"),
            log_dir: PathBuf::from("logs"),
            strict: false,
            log_level: Level::INFO,
        }
    }
}

/// Process outcome, mapped to the binary's exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// Input unreadable, or report/output unwritable.
    IoFailure,
    /// Validation failed and strict mode was on.
    ValidationFailed,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::IoFailure => 1,
            ExitStatus::ValidationFailed => 2,
        }
    }
}

/// Run the pipeline with the default cleaning engine and order contract.
pub fn run(config: &PipelineConfig) -> ExitStatus {
    let engine = match CleaningEngine::new(CleaningOptions::default()) {
        Ok(engine) => engine.with_observer(Arc::new(TracingObserver)),
        Err(e) => {
            error!(error = %e, "Failed to set up cleaning engine");
            return ExitStatus::IoFailure;
        }
    };
    run_with(config, &engine, &SchemaValidator::default())
}

/// Run the pipeline with a caller-provided engine and validator.
pub fn run_with(
    config: &PipelineConfig,
    engine: &CleaningEngine,
    validator: &SchemaValidator,
) -> ExitStatus {
    let raw = match read_table(&config.input) {
        Ok(raw) => raw,
        Err(e) => {
            error!(error = %e, "Failed to read input file");
            return ExitStatus::IoFailure;
        }
    };
    info!(
        "Loaded input file with {} rows and {} columns",
        raw.row_count(),
        raw.column_count()
    );

    let cleaned = engine.clean(&raw);

    let validation = validator.validate(&cleaned.table);
    if validation.ok {
        info!("Validation passed");
    } else {
        warn!("Validation failed with {} errors", validation.errors_count);
    }

    let columns_out = cleaned.table.column_names();
    let report = build_report(ReportInputs {
        input_path: &config.input,
        output_path: &config.output,
        rows_in: raw.row_count(),
        rows_out: cleaned.table.row_count(),
        columns_out: &columns_out,
        cleaning_stats: &cleaned.stats,
        validation: &validation,
    });
    if let Err(e) = write_report_files(&config.report_dir, &report) {
        error!(error = %e, "Failed to write report");
        return ExitStatus::IoFailure;
    }
    info!("Report written to {}", config.report_dir.display());

    if let Err(e) = write_table(&cleaned.table, &config.output) {
        error!(error = %e, "Failed to write output");
        return ExitStatus::IoFailure;
    }
    info!("Output written to {}", config.output.display());

    if !validation.ok && config.strict {
        error!("Strict mode enabled and validation failed. Exiting with code 2");
        return ExitStatus::ValidationFailed;
    }
    ExitStatus::Success
}
