//! Run reports: `report.json` for machines, `report.md` for people.
//!
//! A [`Report`] is assembled from plain data only: cleaning statistics, the validation result and
//! row/column counts. It is written on every run that reaches validation, pass or fail.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::cleaning::CleaningStats;
use crate::error::PipelineResult;
use crate::validation::{ValidationResult, Violation};

/// File name of the structured report inside the report directory.
pub const JSON_REPORT_FILE: &str = "report.json";
/// File name of the human-readable report inside the report directory.
pub const MARKDOWN_REPORT_FILE: &str = "report.md";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMeta {
    /// UTC wall-clock time the report was built, RFC 3339 with a `Z` suffix.
    pub created_at: String,
    pub input_path: String,
    pub output_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowCounts {
    #[serde(rename = "in")]
    pub rows_in: usize,
    #[serde(rename = "out")]
    pub rows_out: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    pub errors_count: usize,
    pub errors_preview_count: usize,
    pub errors: Vec<Violation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSection {
    pub ok: bool,
    pub summary: ValidationSummary,
}

/// Everything persisted about one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub rows: RowCounts,
    pub columns_out: Vec<String>,
    pub cleaning_stats: CleaningStats,
    pub validation: ValidationSection,
}

/// Inputs to [`build_report`].
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    pub input_path: &'a Path,
    pub output_path: &'a Path,
    pub rows_in: usize,
    pub rows_out: usize,
    pub columns_out: &'a [String],
    pub cleaning_stats: &'a CleaningStats,
    pub validation: &'a ValidationResult,
}

/// Assemble a [`Report`], stamping it with the current UTC time.
pub fn build_report(inputs: ReportInputs<'_>) -> Report {
    let validation = inputs.validation;
    Report {
        meta: ReportMeta {
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            input_path: inputs.input_path.display().to_string(),
            output_path: inputs.output_path.display().to_string(),
        },
        rows: RowCounts {
            rows_in: inputs.rows_in,
            rows_out: inputs.rows_out,
            removed: inputs.rows_in.saturating_sub(inputs.rows_out),
        },
        columns_out: inputs.columns_out.to_vec(),
        cleaning_stats: inputs.cleaning_stats.clone(),
        validation: ValidationSection {
            ok: validation.ok,
            summary: ValidationSummary {
                errors_count: validation.errors_count,
                errors_preview_count: validation.errors_preview_count(),
                errors: validation.errors.clone(),
            },
        },
    }
}

/// Paths of the files written by [`write_report_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub markdown: PathBuf,
}

/// Write `report.json` (pretty-printed) and `report.md` into `dir`, creating it if needed.
pub fn write_report_files(dir: impl AsRef<Path>, report: &Report) -> PipelineResult<ReportPaths> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let json = dir.join(JSON_REPORT_FILE);
    fs::write(&json, serde_json::to_string_pretty(report)?)?;

    let markdown = dir.join(MARKDOWN_REPORT_FILE);
    fs::write(&markdown, render_markdown(report))?;

    Ok(ReportPaths { json, markdown })
}

/// Render the human-readable summary.
pub fn render_markdown(report: &Report) -> String {
    let mut md = String::new();
    let stats = &report.cleaning_stats;
    let summary = &report.validation.summary;

    // Writing into a String cannot fail.
    let _ = writeln!(md, "# Data Pipeline Report\n");
    let _ = writeln!(md, "## Meta");
    let _ = writeln!(md, "- Created at: {}", report.meta.created_at);
    let _ = writeln!(md, "- Input: {}", report.meta.input_path);
    let _ = writeln!(md, "- Output: {}\n", report.meta.output_path);

    let _ = writeln!(md, "## Rows");
    let _ = writeln!(md, "- Input rows: {}", report.rows.rows_in);
    let _ = writeln!(md, "- Output rows: {}", report.rows.rows_out);
    let _ = writeln!(md, "- Removed rows: {}\n", report.rows.removed);

    let _ = writeln!(md, "## Columns");
    let _ = writeln!(md, "- Output columns: {}\n", report.columns_out.join(", "));

    let _ = writeln!(md, "## Cleaning stats");
    let _ = writeln!(md, "- columns_before: {}", stats.columns_before.join(", "));
    let _ = writeln!(md, "- columns_after: {}", stats.columns_after.join(", "));
    for (name, value) in stats.counters() {
        let _ = writeln!(md, "- {name}: {value}");
    }

    let _ = writeln!(md, "\n## Validation");
    let _ = writeln!(md, "- OK: {}", report.validation.ok);
    let _ = writeln!(md, "- Errors count: {}", summary.errors_count);
    let _ = writeln!(md, "- Errors preview count: {}\n", summary.errors_preview_count);

    let _ = writeln!(md, "### Errors preview");
    md.push_str(&errors_table(&summary.errors));
    md.push('\n');
    md
}

fn errors_table(errors: &[Violation]) -> String {
    if errors.is_empty() {
        return "No validation errors.".to_string();
    }
    let mut lines = vec![
        "| column | check | row | failure_case |".to_string(),
        "| --- | --- | --- | --- |".to_string(),
    ];
    for v in errors {
        lines.push(format!(
            "| {} | {} | {} | {} |",
            v.column,
            escape_cell(&v.check.to_string()),
            v.row,
            escape_cell(v.failure_case.as_deref().unwrap_or("null")),
        ));
    }
    lines.join("\n")
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
