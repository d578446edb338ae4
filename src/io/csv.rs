//! CSV reading and writing.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::PipelineResult;
use crate::types::{CleanTable, OrderColumn, RawTable, RawValue, format_timestamp};

const UTF8_BOM: &str = "\u{feff}";

/// Read a CSV file (UTF-8, optional BOM) into a [`RawTable`].
///
/// Rules:
///
/// - The first record is the header row.
/// - Only empty cells become [`RawValue::Null`]; everything else is kept verbatim, so text such as
///   `NA` or `None` survives exactly as the workbook reader would keep it.
/// - Ragged rows are accepted; short rows are null-padded downstream.
pub fn read_csv_from_path(path: impl AsRef<Path>) -> PipelineResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    read_csv_from_reader(&mut rdr)
}

/// Read CSV data from an existing CSV reader.
pub fn read_csv_from_reader<R: Read>(rdr: &mut csv::Reader<R>) -> PipelineResult<RawTable> {
    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches(UTF8_BOM).to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut rows: Vec<Vec<RawValue>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(parse_cell).collect());
    }

    Ok(RawTable::new(headers, rows))
}

fn parse_cell(raw: &str) -> RawValue {
    if raw.is_empty() {
        RawValue::Null
    } else {
        RawValue::Text(raw.to_string())
    }
}

/// Write a cleaned table as UTF-8 CSV with a BOM, header first, nulls as empty cells.
pub fn write_csv_to_path(table: &CleanTable, path: impl AsRef<Path>) -> PipelineResult<()> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM.as_bytes())?;
    let mut wtr = csv::Writer::from_writer(file);
    write_csv_to_writer(table, &mut wtr)?;
    wtr.flush()?;
    Ok(())
}

/// Write a cleaned table to an existing CSV writer.
pub fn write_csv_to_writer<W: Write>(
    table: &CleanTable,
    wtr: &mut csv::Writer<W>,
) -> PipelineResult<()> {
    wtr.write_record(OrderColumn::ALL.iter().map(|c| c.name()))?;
    for record in &table.records {
        wtr.write_record(OrderColumn::ALL.map(|column| match column {
            OrderColumn::AmountUsd => record.amount_usd.map(|v| v.to_string()).unwrap_or_default(),
            OrderColumn::CreatedAt => record
                .created_at
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_default(),
            other => record.text(other).unwrap_or_default().to_string(),
        }))?;
    }
    Ok(())
}
