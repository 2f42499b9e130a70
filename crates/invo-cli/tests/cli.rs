//! Integration tests for the `invo` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn invo() -> Command {
    Command::cargo_bin("invo").unwrap()
}

#[test]
fn missing_input_path_fails() {
    invo()
        .arg("does-not-exist.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input path not found"));
}

#[test]
fn empty_directory_reports_no_inputs() {
    let dir = tempfile::tempdir().unwrap();

    invo()
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No valid input files"));
}

#[test]
fn unsupported_extension_fails() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "hello").unwrap();

    invo()
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn image_without_ocr_engine_yields_null_record() {
    let dir = tempfile::tempdir().unwrap();
    let img_path = dir.path().join("receipt.png");
    image::GrayImage::new(16, 16).save(&img_path).unwrap();

    let out_dir = dir.path().join("out");

    // No OCR models are installed: the run still succeeds and produces a
    // record with every field null and no line items.
    invo()
        .arg(&img_path)
        .arg("--output-dir")
        .arg(&out_dir)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out_dir.join("receipt.json")).unwrap())
            .unwrap();

    assert!(json["merchant_name"].is_null());
    assert!(json["invoice_number"].is_null());
    assert!(json["date"].is_null());
    assert!(json["total_amount"].is_null());
    assert!(json["currency"].is_null());
    assert_eq!(json["line_items"], serde_json::json!([]));
}

#[test]
fn directory_run_continues_past_failures() {
    let dir = tempfile::tempdir().unwrap();

    // One valid image and one corrupt "png".
    image::GrayImage::new(16, 16)
        .save(dir.path().join("good.png"))
        .unwrap();
    std::fs::write(dir.path().join("bad.png"), b"not an image").unwrap();

    let out_dir = dir.path().join("out");

    invo()
        .arg(dir.path())
        .arg("--output-dir")
        .arg(&out_dir)
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful"))
        .stdout(predicate::str::contains("1 failed"));

    assert!(out_dir.join("good.json").exists());
    assert!(!out_dir.join("bad.json").exists());

    let summary = std::fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert!(summary.contains("good.png,success"));
    assert!(summary.contains("bad.png,error"));
}
