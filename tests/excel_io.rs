use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{NaiveDate, NaiveDateTime};
use order_cleaner::cleaning::{CleaningEngine, CleaningOptions};
use order_cleaner::io::excel::{read_excel_from_path, write_xlsx_to_path};
use order_cleaner::io::{read_table, write_table};
use order_cleaner::types::{CleanTable, OrderRecord, OrderStatus, RawValue};
use rust_xlsxwriter::{Format, Workbook};

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("order-cleaner-{name}-{nanos}.xlsx"))
}

fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn write_dirty_orders_xlsx(path: &PathBuf) {
    let mut wb = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
    let ws = wb.add_worksheet();
    ws.set_name("Orders").unwrap();

    for (col, header) in [
        " Order ID ",
        "Customer Name",
        "Email",
        "Amount (USD)",
        "Created At",
        "Status",
    ]
    .into_iter()
    .enumerate()
    {
        ws.write_string(0, col as u16, header).unwrap();
    }

    // Native numbers and a native date-time.
    ws.write_number(1, 0, 1001).unwrap();
    ws.write_string(1, 1, "Ann").unwrap();
    ws.write_string(1, 2, "ANN@EXAMPLE.COM").unwrap();
    ws.write_number(1, 3, 12.5).unwrap();
    ws.write_datetime_with_format(1, 4, &ts(2024, 3, 1, 12), &date_format)
        .unwrap();
    ws.write_string(1, 5, "Done").unwrap();

    // Row 2 left blank on purpose.

    // Text-only row.
    ws.write_string(3, 0, "ORD-2").unwrap();
    ws.write_string(3, 1, "Bo").unwrap();
    ws.write_string(3, 2, "bo@example.com").unwrap();
    ws.write_string(3, 3, "1.234,56").unwrap();
    ws.write_string(3, 4, "2024-03-02").unwrap();
    ws.write_string(3, 5, "refunded").unwrap();

    wb.save(path).unwrap();
}

#[test]
fn reads_first_sheet_with_typed_cells() {
    let path = tmp_file("read");
    write_dirty_orders_xlsx(&path);

    let table = read_excel_from_path(&path).unwrap();
    assert_eq!(table.headers[0], " Order ID ");
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows[0][0], RawValue::Float(1001.0));
    assert_eq!(table.rows[0][4], RawValue::Timestamp(ts(2024, 3, 1, 12)));
    assert_eq!(table.rows[1][3], RawValue::from("1.234,56"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn cleans_workbook_input() {
    let path = tmp_file("clean");
    write_dirty_orders_xlsx(&path);

    let raw = read_table(&path).unwrap();
    let out = CleaningEngine::new(CleaningOptions::default())
        .unwrap()
        .clean(&raw);

    assert_eq!(out.table.row_count(), 2);
    let ann = &out.table.records[0];
    assert_eq!(ann.order_id.as_deref(), Some("1001"));
    assert_eq!(ann.email.as_deref(), Some("ann@example.com"));
    assert_eq!(ann.amount_usd, Some(12.5));
    assert_eq!(ann.created_at, Some(ts(2024, 3, 1, 12)));
    assert_eq!(ann.status, Some(OrderStatus::Paid));
    assert_eq!(ann.country, None);

    let bo = &out.table.records[1];
    assert_eq!(bo.amount_usd, Some(1234.56));
    assert_eq!(bo.created_at, Some(ts(2024, 3, 2, 0)));
    assert!(out.stats.is_clean(), "stats: {}", out.stats);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn written_workbook_reads_back_as_the_same_table() {
    let path = tmp_file("roundtrip");
    let table = CleanTable::new(vec![
        OrderRecord {
            order_id: Some("ORD-1".to_string()),
            customer_name: Some("Ann".to_string()),
            email: Some("ann@example.com".to_string()),
            amount_usd: Some(1234.56),
            created_at: Some(ts(2024, 1, 15, 9)),
            status: Some(OrderStatus::Paid),
            country: None,
        },
        OrderRecord {
            order_id: Some("ORD-2".to_string()),
            customer_name: Some("Bo".to_string()),
            amount_usd: Some(5.0),
            ..Default::default()
        },
    ]);
    write_xlsx_to_path(&table, &path).unwrap();

    let raw = read_table(&path).unwrap();
    let out = CleaningEngine::new(CleaningOptions::default())
        .unwrap()
        .clean(&raw);

    // ORD-2 has no timestamp, so it sorts first.
    assert_eq!(out.table.records[0].order_id.as_deref(), Some("ORD-2"));
    assert_eq!(out.table.records[1], table.records[0]);
    assert!(out.stats.is_clean());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn csv_and_workbook_inputs_clean_identically() {
    let xlsx_path = tmp_file("same-table");
    let csv_path = xlsx_path.with_extension("csv");
    let headers = ["order_id", "customer_name", "amount_usd", "country"];
    let rows = [["ORD-1", "None", "10", "NA"], ["ORD-2", "null", "5.5", "N/A"]];

    let mut csv_text = headers.join(",");
    for row in &rows {
        csv_text.push('\n');
        csv_text.push_str(&row.join(","));
    }
    std::fs::write(&csv_path, csv_text).unwrap();

    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        ws.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            ws.write_string(r as u32 + 1, col as u16, *cell).unwrap();
        }
    }
    wb.save(&xlsx_path).unwrap();

    let engine = CleaningEngine::new(CleaningOptions::default()).unwrap();
    let from_csv = engine.clean(&read_table(&csv_path).unwrap());
    let from_xlsx = engine.clean(&read_table(&xlsx_path).unwrap());

    assert_eq!(from_csv, from_xlsx);
    assert_eq!(from_csv.table.row_count(), 2);
    let first = &from_csv.table.records[0];
    assert_eq!(first.customer_name.as_deref(), Some("None"));
    assert_eq!(first.amount_usd, Some(10.0));
    assert_eq!(first.country.as_deref(), Some("NA"));
    assert_eq!(from_csv.table.records[1].country.as_deref(), Some("N/A"));
    assert_eq!(from_csv.stats.dropped_missing_required, 0);

    let _ = std::fs::remove_file(&csv_path);
    let _ = std::fs::remove_file(&xlsx_path);
}

#[test]
fn write_table_creates_parent_directories() {
    let dir = tmp_file("nested").with_extension("");
    let path = dir.join("a").join("b").join("out.xlsx");
    write_table(&CleanTable::default(), &path).unwrap();

    let raw = read_table(&path).unwrap();
    assert_eq!(raw.headers.len(), 7);
    assert_eq!(raw.row_count(), 0);

    let _ = std::fs::remove_dir_all(&dir);
}
