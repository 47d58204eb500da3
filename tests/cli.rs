use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command with HOME pointed at a scratch directory so the settings file
/// never touches the real one.
fn inout(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("inout");
    cmd.env("HOME", home).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn setup() -> (TempDir, std::path::PathBuf) {
    let home = tempfile::tempdir().unwrap();
    let ws = home.path().join("books");
    inout(home.path())
        .args(["init", "--dir"])
        .arg(&ws)
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized inout"));
    (home, ws)
}

#[test]
fn test_init_seeds_vocabulary() {
    let (home, ws) = setup();
    assert!(ws.join("workspace_info.json").exists());
    assert!(ws.join("categories.json").exists());

    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["categories", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("motors"))
        .stdout(predicate::str::contains("groceries"));
}

#[test]
fn test_init_twice_is_harmless() {
    let (home, ws) = setup();
    inout(home.path())
        .args(["init", "--dir"])
        .arg(&ws)
        .assert()
        .success()
        .stdout(predicate::str::contains("already initialized"));
}

#[test]
fn test_categorize_fuel() {
    let (home, ws) = setup();
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["categorize", "SASOL FUEL", "--amount", "-450"])
        .assert()
        .success()
        .stdout(predicate::str::contains("motors/fuel"));
}

#[test]
fn test_categorize_no_match() {
    let (home, ws) = setup();
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["categorize", "XYZ UNKNOWN VENDOR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No category matched"));
}

#[test]
fn test_categorize_empty_description_fails() {
    let (home, ws) = setup();
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["categorize", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn test_categorize_bad_threshold_fails() {
    let (home, ws) = setup();
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["categorize", "SASOL", "--threshold", "1.5"])
        .assert()
        .failure();
}

#[test]
fn test_custom_label_learns() {
    let (home, ws) = setup();
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["categories", "add", "pets", "--description", "Animals"])
        .assert()
        .success();
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["labels", "add", "pets", "vet", "--pattern", "vetcare", "--keyword", "vet"])
        .assert()
        .success();
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["keywords", "add", "pets", "vet", "clinic"])
        .assert()
        .success();

    // vetcare + vet + clinic + label name = 0.4 + 0.2 + 0.2 + 0.3
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["categorize", "VETCARE CLINIC"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pets/vet"));

    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["patterns", "list", "--category", "pets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vetcare"));
}

#[test]
fn test_delete_category_with_labels_needs_force() {
    let (home, ws) = setup();
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["categories", "delete", "motors"])
        .assert()
        .failure();
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["categories", "delete", "motors", "--force"])
        .assert()
        .success();
}

#[test]
fn test_import_and_summary() {
    let (home, ws) = setup();
    let csv_path = home.path().join("statement.csv");
    std::fs::write(
        &csv_path,
        "Date,Description,Amount\n\
         2024-03-01,SASOL FUEL PRETORIA,-450.00\n\
         2024-03-02,SALARY ACME,25000.00\n\
         2024-03-03,MYSTERY SHOP,-12.50\n",
    )
    .unwrap();

    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .arg("import")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 imported"));

    // Same file again is rejected by checksum.
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .arg("import")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("already been imported"));

    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["transactions", "list", "--category", "motors"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SASOL FUEL PRETORIA"));

    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["transactions", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("R25,000.00"));
}

#[test]
fn test_add_transaction_and_budget_status() {
    let (home, ws) = setup();
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args([
            "transactions",
            "add",
            "2024-05-10",
            "WOOLWORTHS FOOD",
            "-900",
            "--category",
            "groceries",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("groceries"));

    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["budgets", "set", "groceries", "1000"])
        .assert()
        .success();

    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["budgets", "status", "--as-of", "2024-05-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("warning"));
}

#[test]
fn test_currency_convert() {
    let (home, ws) = setup();
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["currency", "convert", "100", "USD", "ZAR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1,850.00"));
}

#[test]
fn test_missing_workspace_is_an_error() {
    let home = tempfile::tempdir().unwrap();
    inout(home.path())
        .arg("--workspace")
        .arg(home.path().join("nowhere"))
        .args(["categories", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_currency_add_then_convert() {
    let (home, ws) = setup();
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["currency", "add", "BWP", "P", "Botswana Pula", "1.35"])
        .assert()
        .success();
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["currency", "convert", "100", "BWP", "ZAR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("R135.00"));
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["currency", "add", "USD", "$", "Dollar", "18"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Already exists"));
}

#[test]
fn test_export_to_file() {
    let (home, ws) = setup();
    let out = home.path().join("export.json");
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["transactions", "add", "2024-05-10", "SASOL", "-300"])
        .assert()
        .success();
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .args(["export", "--skip-budgets", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to"));
    let doc: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(doc["transactions"][0]["description"], "SASOL");
    assert!(doc["categories"].is_array());
    assert!(doc.get("budgets").is_none());
}

#[test]
fn test_review_stops_when_input_is_closed() {
    let (home, ws) = setup();
    for (date, desc) in [("2024-05-10", "MYSTERY ONE"), ("2024-05-11", "MYSTERY TWO")] {
        inout(home.path())
            .arg("--workspace")
            .arg(&ws)
            .args(["transactions", "add", date, desc, "-10"])
            .assert()
            .success();
    }
    inout(home.path())
        .arg("--workspace")
        .arg(&ws)
        .arg("review")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Review paused"))
        .stdout(predicate::str::contains("MYSTERY TWO").not());
}
