//! Workbook reading (`calamine`) and `.xlsx` writing (`rust_xlsxwriter`).

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use rust_xlsxwriter::{Format, Workbook};

use crate::error::{PipelineError, PipelineResult};
use crate::types::{CleanTable, OrderColumn, RawTable, RawValue};

/// Name of the single sheet written by [`write_xlsx_to_path`].
pub const SHEET_NAME: &str = "Sheet1";

/// Read the first sheet of a workbook (`.xlsx`, `.xls`, `.ods`, etc.) into a [`RawTable`].
///
/// Behavior:
/// - Detects the first non-empty row as the header row
/// - Skips rows whose cells are all empty
/// - Keeps native cell types (numbers, booleans, date-times) as typed [`RawValue`]s
pub fn read_excel_from_path(path: impl AsRef<Path>) -> PipelineResult<RawTable> {
    let mut workbook = open_workbook_auto(path)?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| PipelineError::Malformed {
            message: "workbook has no sheets".to_string(),
        })?;
    let range = workbook.worksheet_range(&first)?;
    read_sheet_range(&first, &range)
}

fn read_sheet_range(sheet: &str, range: &Range<Data>) -> PipelineResult<RawTable> {
    let mut rows_iter = range
        .rows()
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)));

    let headers: Vec<String> = rows_iter
        .next()
        .ok_or_else(|| PipelineError::Malformed {
            message: format!("sheet '{sheet}' has no non-empty rows (no header row found)"),
        })?
        .iter()
        .map(cell_to_header_string)
        .collect();

    let rows = rows_iter
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    Ok(RawTable::new(headers, rows))
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Empty => String::new(),
        other => convert_cell(other).to_text().unwrap_or_default(),
    }
}

fn convert_cell(c: &Data) -> RawValue {
    match c {
        Data::Empty => RawValue::Null,
        Data::String(s) if s.is_empty() => RawValue::Null,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::Text(s.clone()),
        Data::Int(i) => RawValue::Int(*i),
        Data::Float(f) => RawValue::Float(*f),
        Data::Bool(b) => RawValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or_else(|| RawValue::Float(dt.as_f64()), RawValue::Timestamp),
        Data::Error(e) => RawValue::Text(format!("{e:?}")),
    }
}

/// Write a cleaned table to a single-sheet `.xlsx` workbook.
///
/// Amounts are numeric cells, timestamps are date-time cells, nulls are left blank.
pub fn write_xlsx_to_path(table: &CleanTable, path: impl AsRef<Path>) -> PipelineResult<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for column in OrderColumn::ALL {
        worksheet.write_string_with_format(0, column_number(column), column.name(), &header_format)?;
    }

    for (idx0, record) in table.records.iter().enumerate() {
        let row = u32::try_from(idx0 + 1).map_err(|_| PipelineError::Malformed {
            message: format!("too many rows for a worksheet ({})", table.row_count()),
        })?;
        for column in OrderColumn::ALL {
            let col = column_number(column);
            match column {
                OrderColumn::AmountUsd => {
                    if let Some(v) = record.amount_usd {
                        worksheet.write_number(row, col, v)?;
                    }
                }
                OrderColumn::CreatedAt => {
                    if let Some(ts) = &record.created_at {
                        worksheet.write_datetime_with_format(row, col, ts, &datetime_format)?;
                    }
                }
                text_column => {
                    if let Some(s) = record.text(text_column) {
                        worksheet.write_string(row, col, s)?;
                    }
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn column_number(column: OrderColumn) -> u16 {
    // At most seven logical columns.
    column.index() as u16
}
