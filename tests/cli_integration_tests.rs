//! CLI Integration Tests
//!
//! Tests the ingaz binary directly using assert_cmd to exercise main.rs
//! code paths. Fixtures are generated next to each test.

#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use predicates::prelude::*;
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_fixture(path: &Path) {
    let mut workbook = XlsxWorkbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("علوم 07 1").unwrap();
    sheet.write_string(2, 7, "2024-09-10").unwrap();
    sheet.write_string(2, 8, "2024-09-17").unwrap();
    sheet.write_string(4, 0, "الطالب").unwrap();
    sheet.write_string(4, 7, "واجب 1").unwrap();
    sheet.write_string(4, 8, "واجب 2").unwrap();
    sheet.write_string(5, 0, "أحمد محمد").unwrap();
    sheet.write_string(5, 7, "تم").unwrap();
    sheet.write_string(5, 8, "تم").unwrap();
    sheet.write_string(6, 0, "سارة خالد").unwrap();
    sheet.write_string(6, 7, "تم").unwrap();
    sheet.write_string(6, 8, "M").unwrap();

    workbook.save(path).unwrap();
}

/// Headers in row 2, due dates in row 1, assessments from column C
fn write_compact_fixture(path: &Path) {
    let mut workbook = XlsxWorkbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("علوم 05 1").unwrap();
    sheet.write_string(0, 2, "2024-09-10").unwrap();
    sheet.write_string(1, 0, "الطالب").unwrap();
    sheet.write_string(1, 2, "اختبار").unwrap();
    sheet.write_string(2, 0, "أحمد").unwrap();
    sheet.write_string(2, 2, "تم").unwrap();
    workbook.save(path).unwrap();
}

fn fixture(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("grades.xlsx");
    write_fixture(&path);
    path
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ingaz"))
        .stdout(predicate::str::contains("COMMANDS"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ingaz"));
}

#[test]
fn test_cli_without_subcommand_fails() {
    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.assert().failure();
}

// ═══════════════════════════════════════════════════════════════════════════
// SUBCOMMAND HELP TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_analyze_help() {
    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args(["analyze", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("categorize every student"));
}

#[test]
fn test_summary_help() {
    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args(["summary", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("due-date range"));
}

#[test]
fn test_report_card_help() {
    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args(["report-card", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("report cards"));
}

#[test]
fn test_digest_help() {
    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args(["digest", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("digest"));
}

#[test]
fn test_watch_help() {
    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args(["watch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Watch"));
}

// ═══════════════════════════════════════════════════════════════════════════
// ANALYZE EXECUTION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_analyze_command() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args(["analyze", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("علوم 07 1"))
        .stdout(predicate::str::contains("Analyzed 1 sheets"));
}

#[test]
fn test_analyze_verbose_lists_students() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args(["analyze", path.to_str().unwrap(), "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("أحمد محمد"))
        .stdout(predicate::str::contains("سارة خالد"));
}

#[test]
fn test_analyze_json_output() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args(["analyze", path.to_str().unwrap(), "--json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["))
        .stdout(predicate::str::contains("\"solvePct\""))
        .stdout(predicate::str::contains("أحمد محمد"));
}

#[test]
fn test_analyze_nonexistent_file() {
    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args(["analyze", "nonexistent.xlsx"]).assert().failure();
}

#[test]
fn test_analyze_lone_from_flag_rejected() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args(["analyze", path.to_str().unwrap(), "--from", "2024-09-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--from and --to"));
}

#[test]
fn test_analyze_layout_flags() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("compact.xlsx");
    write_compact_fixture(&path);

    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args([
        "analyze",
        path.to_str().unwrap(),
        "--start-col",
        "C",
        "--names-row",
        "2",
        "--due-row",
        "1",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("علوم 05 1"))
    .stdout(predicate::str::contains("Analyzed 1 sheets"));
}

#[test]
fn test_analyze_invalid_layout_flag_rejected() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args(["analyze", path.to_str().unwrap(), "--start-col", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid start column letter"));
}

// ═══════════════════════════════════════════════════════════════════════════
// SUMMARY EXECUTION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_summary_command() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args([
        "summary",
        path.to_str().unwrap(),
        "--from",
        "2024-09-01",
        "--to",
        "2024-09-30",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Achievement Summary"))
    .stdout(predicate::str::contains("علوم"));
}

#[test]
fn test_summary_reversed_range_fails() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args([
        "summary",
        path.to_str().unwrap(),
        "--from",
        "2024-09-30",
        "--to",
        "2024-09-01",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("reversed"));
}

#[test]
fn test_summary_requires_range_flags() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args(["summary", path.to_str().unwrap()]).assert().failure();
}

// ═══════════════════════════════════════════════════════════════════════════
// REPORT-CARD AND DIGEST EXECUTION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_report_card_command() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);
    let cards = dir.path().join("cards");

    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args([
        "report-card",
        path.to_str().unwrap(),
        "-o",
        cards.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Wrote 2 report cards"));

    assert_eq!(std::fs::read_dir(&cards).unwrap().count(), 2);
}

#[test]
fn test_digest_command() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args(["digest", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("الإحصائيات العامة"));
}

#[test]
fn test_digest_html_to_file() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);
    let out = dir.path().join("digest.html");

    let mut cmd = Command::cargo_bin("ingaz").unwrap();
    cmd.args([
        "digest",
        path.to_str().unwrap(),
        "--html",
        "-o",
        out.to_str().unwrap(),
    ])
    .assert()
    .success();

    let document = std::fs::read_to_string(&out).unwrap();
    assert!(document.contains("<!DOCTYPE html>"));
}
