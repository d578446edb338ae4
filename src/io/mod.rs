//! Table I/O.
//!
//! Most callers should use [`read_table`] and [`write_table`], which pick a [`TableFormat`] from the
//! file extension and dispatch to [`csv`] or [`excel`].
//!
//! - Reading accepts `.csv` and workbook extensions (`.xlsx`, `.xlsm`, `.xls`, `.xlsb`, `.ods`).
//! - Writing accepts `.csv`, `.xlsx` and `.xlsm`, and creates missing parent directories.

pub mod csv;
pub mod excel;

use std::fs;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{CleanTable, RawTable};

/// Supported table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet/workbook formats.
    Excel,
}

impl TableFormat {
    /// Parse a table format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Infer the format of `path` from its extension.
    pub fn from_path(path: &Path) -> PipelineResult<Self> {
        let ext = extension_of(path);
        Self::from_extension(&ext).ok_or_else(|| PipelineError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: ext,
        })
    }
}

/// Read a table from `path`, inferring the format from its extension.
///
/// # Errors
///
/// - [`PipelineError::InputNotFound`] when `path` does not exist
/// - [`PipelineError::UnsupportedFormat`] for unknown extensions
/// - any reader error from the selected format
pub fn read_table(path: impl AsRef<Path>) -> PipelineResult<RawTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PipelineError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    match TableFormat::from_path(path)? {
        TableFormat::Csv => csv::read_csv_from_path(path),
        TableFormat::Excel => excel::read_excel_from_path(path),
    }
}

/// Write a cleaned table to `path`, inferring the format from its extension.
///
/// Only `.xlsx`/`.xlsm` workbooks can be written; `.xls`, `.xlsb` and `.ods` are rejected before
/// anything touches the filesystem.
pub fn write_table(table: &CleanTable, path: impl AsRef<Path>) -> PipelineResult<()> {
    let path = path.as_ref();
    let format = TableFormat::from_path(path)?;
    let ext = extension_of(path).to_ascii_lowercase();
    if format == TableFormat::Excel && !matches!(ext.as_str(), "xlsx" | "xlsm") {
        return Err(PipelineError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: ext,
        });
    }

    ensure_parent_dir(path)?;
    match format {
        TableFormat::Csv => csv::write_csv_to_path(table, path),
        TableFormat::Excel => excel::write_xlsx_to_path(table, path),
    }
}

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> PipelineResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_format_from_extension() {
        assert_eq!(TableFormat::from_extension("CSV"), Some(TableFormat::Csv));
        assert_eq!(TableFormat::from_extension("xlsx"), Some(TableFormat::Excel));
        assert_eq!(TableFormat::from_extension("ods"), Some(TableFormat::Excel));
        assert_eq!(TableFormat::from_extension("parquet"), None);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = TableFormat::from_path(Path::new("orders.txt")).unwrap_err();
        match err {
            PipelineError::UnsupportedFormat { extension, .. } => assert_eq!(extension, "txt"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            TableFormat::from_path(Path::new("orders")),
            Err(PipelineError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn missing_input_is_reported_before_format() {
        let err = read_table("definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, PipelineError::InputNotFound { .. }));
    }

    #[test]
    fn legacy_workbook_formats_cannot_be_written() {
        let err = write_table(&CleanTable::default(), "out.ods").unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
    }
}
