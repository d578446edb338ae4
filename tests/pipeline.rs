use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use order_cleaner::io::read_table;
use order_cleaner::pipeline::{ExitStatus, PipelineConfig, run};

const FIXTURE: &str = "tests/fixtures/orders_dirty.csv";

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("order-cleaner-{name}-{nanos}"))
}

fn config(dir: &Path, input: impl Into<PathBuf>, output: &str) -> PipelineConfig {
    PipelineConfig {
        report_dir: dir.join("reports"),
        log_dir: dir.join("logs"),
        ..PipelineConfig::new(input, dir.join(output))
    }
}

fn report_json(dir: &Path) -> serde_json::Value {
    let text = fs::read_to_string(dir.join("reports").join("report.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn failed_validation_without_strict_still_succeeds() {
    let dir = tmp_dir("non-strict");
    let cfg = config(&dir, FIXTURE, "out/clean.csv");

    assert_eq!(run(&cfg), ExitStatus::Success);

    let output = fs::read_to_string(&cfg.output).unwrap();
    assert!(output.starts_with("\u{feff}order_id,customer_name,email,amount_usd,created_at,status,country\n"));
    assert_eq!(output.lines().count(), 6);
    assert!(output.contains("ORD-1001,Alice,alice@example.com,1234.56,2024-01-15 10:30:00,paid,USA"));

    let report = report_json(&dir);
    assert_eq!(report["rows"]["in"], 10);
    assert_eq!(report["rows"]["out"], 5);
    assert_eq!(report["rows"]["removed"], 5);
    assert_eq!(report["columns_out"].as_array().unwrap().len(), 7);
    assert_eq!(report["cleaning_stats"]["dropped_duplicates"], 2);
    assert_eq!(report["validation"]["ok"], false);
    assert_eq!(report["validation"]["summary"]["errors_count"], 1);
    assert_eq!(report["meta"]["input_path"], FIXTURE);

    let md = fs::read_to_string(dir.join("reports").join("report.md")).unwrap();
    assert!(md.contains("## Cleaning stats"));
    assert!(md.contains("| amount_usd | in_range(0, 100000) | 4 | 250000 |"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn strict_mode_exits_with_validation_failure_after_writing_everything() {
    let dir = tmp_dir("strict");
    let mut cfg = config(&dir, FIXTURE, "clean.csv");
    cfg.strict = true;

    assert_eq!(run(&cfg), ExitStatus::ValidationFailed);
    assert_eq!(ExitStatus::ValidationFailed.code(), 2);
    assert!(cfg.output.exists());
    assert!(dir.join("reports").join("report.json").exists());
    assert!(dir.join("reports").join("report.md").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn strict_mode_passes_on_clean_input() {
    let dir = tmp_dir("strict-clean");
    fs::create_dir_all(&dir).unwrap();
    let input = dir.join("orders.csv");
    fs::write(
        &input,
        "order_id,customer_name,email,amount_usd,created_at,status,country\n\
         ORD-1,Ann,ann@example.com,10.5,2024-01-01 00:00:00,paid,USA\n",
    )
    .unwrap();
    let mut cfg = config(&dir, &input, "clean.csv");
    cfg.strict = true;

    assert_eq!(run(&cfg), ExitStatus::Success);
    let report = report_json(&dir);
    assert_eq!(report["validation"]["ok"], true);
    assert_eq!(report["validation"]["summary"]["errors_preview_count"], 0);
    let md = fs::read_to_string(dir.join("reports").join("report.md")).unwrap();
    assert!(md.contains("No validation errors."));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_input_is_an_io_failure_without_report() {
    let dir = tmp_dir("missing-input");
    let cfg = config(&dir, dir.join("nope.csv"), "clean.csv");

    assert_eq!(run(&cfg), ExitStatus::IoFailure);
    assert!(!dir.join("reports").exists());
    assert!(!cfg.output.exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn unsupported_output_fails_after_report_is_written() {
    let dir = tmp_dir("bad-output");
    let cfg = config(&dir, FIXTURE, "clean.json");

    assert_eq!(run(&cfg), ExitStatus::IoFailure);
    assert!(dir.join("reports").join("report.json").exists());
    assert!(!cfg.output.exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn writes_xlsx_output() {
    let dir = tmp_dir("xlsx-output");
    let cfg = config(&dir, FIXTURE, "clean.xlsx");

    assert_eq!(run(&cfg), ExitStatus::Success);

    let table = read_table(&cfg.output).unwrap();
    assert_eq!(
        table.headers,
        vec!["order_id", "customer_name", "email", "amount_usd", "created_at", "status", "country"]
    );
    assert_eq!(table.row_count(), 5);

    let _ = fs::remove_dir_all(&dir);
}
