use predicates::prelude::*;

use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write a minimal coverage workbook: header row plus one row per entry,
/// with indicator cells as text the way spreadsheet authors type them.
fn write_coverage_workbook(path: &Path, rows: &[(&str, &str, &str)]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Coverage").unwrap();
    sheet.write_string(0, 0, "Technique").unwrap();
    sheet.write_string(0, 1, "Data Source").unwrap();
    sheet.write_string(0, 2, "Detection").unwrap();
    for (i, (technique, data_source, detection)) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, *technique).unwrap();
        sheet.write_string(row, 1, *data_source).unwrap();
        sheet.write_string(row, 2, *detection).unwrap();
    }
    workbook.save(path).unwrap();
}

/// Test that the binary runs and shows help
#[test]
fn test_help_command() {
    assert_cmd::cargo_bin_cmd!("mitrenize")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ATT&CK Navigator layer"));
}

/// Test that the binary shows version
#[test]
fn test_version_command() {
    assert_cmd::cargo_bin_cmd!("mitrenize")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mitrenize"));
}

/// Test run with nonexistent input workbook
#[test]
fn test_missing_input_workbook() {
    assert_cmd::cargo_bin_cmd!("mitrenize")
        .arg("/nonexistent/mapping.xlsx")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

/// Test a full run writing the layer to an explicit output path
#[test]
fn test_generates_layer_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("mapping.xlsx");
    let output = temp_dir.path().join("coverage.json");

    write_coverage_workbook(&input, &[("T1059", "x", ""), ("T1055", "x", "x")]);

    assert_cmd::cargo_bin_cmd!("mitrenize")
        .args([input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Layer written to"));

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("\"techniqueID\": \"T1059\""));
    assert!(content.contains("\"techniqueID\": \"T1055\""));
}

/// Test that the default output filename derives from the layer name
#[test]
fn test_default_output_filename() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("mitre-mapping.xlsx");
    write_coverage_workbook(&input, &[("T1566", "x", "")]);

    // No input argument either: the default workbook name is picked up from
    // the working directory
    assert_cmd::cargo_bin_cmd!("mitrenize")
        .current_dir(temp_dir.path())
        .assert()
        .success();

    let expected = temp_dir
        .path()
        .join("data-source-and-detection-coverage.json");
    assert!(expected.is_file());
}

/// Test that a custom layer name lands in the document and the filename
#[test]
fn test_custom_layer_name_and_description() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("mapping.xlsx");
    write_coverage_workbook(&input, &[("T1003", "", "x")]);

    assert_cmd::cargo_bin_cmd!("mitrenize")
        .current_dir(temp_dir.path())
        .args([
            input.to_str().unwrap(),
            "--name",
            "SOC Coverage",
            "--description",
            "Quarterly review",
        ])
        .assert()
        .success();

    let output = temp_dir.path().join("soc-coverage.json");
    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("\"name\": \"SOC Coverage\""));
    assert!(content.contains("\"description\": \"Quarterly review\""));
}

/// Test that a missing required column is fatal and produces no output file
#[test]
fn test_missing_column_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("mapping.xlsx");
    let output = temp_dir.path().join("coverage.json");

    // Workbook without a detection column
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Coverage").unwrap();
    sheet.write_string(0, 0, "Technique").unwrap();
    sheet.write_string(0, 1, "Data Source").unwrap();
    sheet.write_string(1, 0, "T1059").unwrap();
    sheet.write_string(1, 1, "x").unwrap();
    workbook.save(&input).unwrap();

    assert_cmd::cargo_bin_cmd!("mitrenize")
        .args([input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required column"));

    assert!(!output.exists());
}

/// Test that asking for a worksheet the workbook doesn't have is fatal
#[test]
fn test_missing_sheet_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("mapping.xlsx");
    write_coverage_workbook(&input, &[("T1059", "x", "")]);

    assert_cmd::cargo_bin_cmd!("mitrenize")
        .args([input.to_str().unwrap(), "--sheet", "Detections"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no worksheet named"));
}

/// Test that malformed rows are skipped with a warning while the run succeeds
#[test]
fn test_malformed_rows_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("mapping.xlsx");
    let output = temp_dir.path().join("coverage.json");

    write_coverage_workbook(
        &input,
        &[
            ("T1059", "x", "x"),
            ("not-a-technique", "x", ""),
            ("T1003", "maybe", ""),
            ("T1566", "", "x"),
        ],
    );

    assert_cmd::cargo_bin_cmd!("mitrenize")
        .args([input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("rows skipped"));

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("T1059"));
    assert!(content.contains("T1566"));
    assert!(!content.contains("not-a-technique"));
    assert!(!content.contains("T1003"));
}

/// Test that two runs on the same input produce byte-identical output
#[test]
fn test_runs_are_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("mapping.xlsx");
    let first = temp_dir.path().join("first.json");
    let second = temp_dir.path().join("second.json");

    write_coverage_workbook(
        &input,
        &[("T1059", "x", ""), ("T1055", "x", "x"), ("T1105", "", "")],
    );

    for output in [&first, &second] {
        assert_cmd::cargo_bin_cmd!("mitrenize")
            .args([input.to_str().unwrap(), "-o", output.to_str().unwrap()])
            .assert()
            .success();
    }

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

/// Test verbose flag
#[test]
fn test_verbose_flag() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("mapping.xlsx");
    let output = temp_dir.path().join("coverage.json");
    write_coverage_workbook(&input, &[("T1059", "x", "")]);

    assert_cmd::cargo_bin_cmd!("mitrenize")
        .args(["-v", input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .assert()
        .success();
}
