use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error type returned by table I/O, report writing and engine setup.
///
/// Normalization and validation never fail with this type: malformed values degrade to nulls and
/// schema problems are collected into a [`crate::validation::ValidationResult`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Underlying I/O error (e.g. permission denied, disk full).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The input file does not exist.
    #[error("input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// The file extension does not map to a supported table format.
    #[error("unsupported file extension '{extension}' for path ({})", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// CSV read/write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook read error.
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// Workbook write error.
    #[error("xlsx write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Report serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The normalization worker pool could not be built.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Engine options that cannot be honored (e.g. a zero chunk size).
    #[error("invalid options: {message}")]
    InvalidOptions { message: String },

    /// The input is structurally unusable (e.g. a workbook without a header row).
    #[error("malformed input: {message}")]
    Malformed { message: String },
}
