use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;

const HISTORY: &str = r#"{"ok": true,
  "ds": ["2012-10-05", "2012-10-12", "2012-10-19", "2012-10-26"],
  "y": [24924.5, 46039.49, 41595.55, 19403.54]}"#;

const FORECAST: &str = r#"{"ok": true, "model": "prophet",
  "ds": ["2012-11-02", "2012-11-09", "2012-11-16"],
  "yhat": [100.0, 120.0, 90.0],
  "safety_stock": [10.0, 12.0, 9.0],
  "required_stock": [110.0, 132.0, 99.0],
  "order_qty": [-10.0, 12.0, -21.0]}"#;

fn write_fixtures(dir: &Path, history: &str, forecast: &str) {
    fs::write(dir.join("history.json"), history).unwrap();
    fs::write(dir.join("forecast.json"), forecast).unwrap();
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("demandiq").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("demandiq"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn run_from_saved_responses() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixtures(tmp.path(), HISTORY, FORECAST);
    let out = tmp.path().join("charts");
    let export = tmp.path().join("reorder.csv");

    let mut cmd = Command::cargo_bin("demandiq").unwrap();
    cmd.args(["run", "--store", "1", "--dept", "1", "--safety", "10"])
        .arg("--from-dir")
        .arg(tmp.path())
        .arg("--out-dir")
        .arg(&out)
        .arg("--export")
        .arg(&export);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Order Qty"))
        .stdout(predicate::str::contains("12.00  <- order"))
        .stdout(predicate::str::contains(
            "Week 1 suggested order: 12 units (Model: PROPHET, Safety: 10%)",
        ));

    let history_svg = fs::read_to_string(out.join("history.svg")).unwrap();
    assert!(history_svg.contains("2012-10-12"));
    assert!(out.join("forecast.svg").exists());
    let csv = fs::read_to_string(&export).unwrap();
    assert!(csv.contains("2,2012-11-09,120.00,12.00,132.00,12.00"));
}

#[test]
fn forecast_failure_still_writes_history_chart() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixtures(
        tmp.path(),
        HISTORY,
        r#"{"ok": false, "error": "Not enough history to forecast"}"#,
    );
    let out = tmp.path().join("charts");

    let mut cmd = Command::cargo_bin("demandiq").unwrap();
    cmd.args(["run", "-s", "1", "-d", "1"])
        .arg("--from-dir")
        .arg(tmp.path())
        .arg("--out-dir")
        .arg(&out);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Not enough history to forecast"));

    assert!(out.join("history.svg").exists());
    assert!(!out.join("forecast.svg").exists());
}

#[test]
fn invalid_ids_are_rejected_before_fetching() {
    // No fixtures: reaching the data source would fail with a different message.
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("demandiq").unwrap();
    cmd.args(["run", "--store", "x1", "--dept", "1"])
        .arg("--from-dir")
        .arg(tmp.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Please enter valid Store and Dept IDs."));
}

#[test]
fn summary_from_saved_history() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixtures(tmp.path(), HISTORY, FORECAST);
    let mut cmd = Command::cargo_bin("demandiq").unwrap();
    cmd.args(["summary", "-s", "1", "-d", "1", "--locale", "en"])
        .arg("--from-dir")
        .arg(tmp.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2012-10-05 .. 2012-10-26"))
        .stdout(predicate::str::contains("131,963"));
}

#[test]
fn plan_recomputes_saved_forecast() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixtures(tmp.path(), HISTORY, FORECAST);
    let export = tmp.path().join("plan.json");

    let mut cmd = Command::cargo_bin("demandiq").unwrap();
    cmd.args(["plan", "--stock", "100", "--safety", "20"])
        .arg("--forecast")
        .arg(tmp.path().join("forecast.json"))
        .arg("--export")
        .arg(&export);
    // yhat 100/120/90 with 20% safety against 100 on hand: orders 20, 44, 8.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("44.00  <- order"))
        .stdout(predicate::str::contains(
            "Week 1 suggested order: 20 units (Model: PROPHET, Safety: 20%)",
        ));
    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(saved["rows"].as_array().unwrap().len(), 3);
}

#[test]
fn saves_history_when_forecast_never_arrives() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("history.json"), HISTORY).unwrap();
    let saved = tmp.path().join("saved");

    let mut cmd = Command::cargo_bin("demandiq").unwrap();
    cmd.args(["run", "-s", "1", "-d", "1"])
        .arg("--from-dir")
        .arg(tmp.path())
        .arg("--save-responses")
        .arg(&saved)
        .arg("--out-dir")
        .arg(tmp.path().join("charts"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Saved history only"));
    assert!(saved.join("history.json").exists());
    assert!(!saved.join("forecast.json").exists());
}

#[test]
fn chart_kind_and_colors_from_flags() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixtures(tmp.path(), HISTORY, FORECAST);
    let out = tmp.path().join("charts");

    let mut cmd = Command::cargo_bin("demandiq").unwrap();
    cmd.args(["run", "-s", "1", "-d", "1", "--chart-kind", "bar", "--history-color", "orange"])
        .arg("--from-dir")
        .arg(tmp.path())
        .arg("--out-dir")
        .arg(&out);
    cmd.assert().success();
    let svg = fs::read_to_string(out.join("history.svg")).unwrap().to_uppercase();
    assert!(svg.contains("<POLYLINE"));
    assert!(svg.contains("#FFA500"));
}

// Live test (opt-in): cargo test --features online
#[cfg(feature = "online")]
#[test]
fn list_options_online() {
    let mut cmd = Command::cargo_bin("demandiq").unwrap();
    cmd.arg("options");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("stores:"));
}
