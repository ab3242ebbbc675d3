//! End-to-end tests for the `canteiro` binary against snapshot files.

use assert_cmd::Command;
use indoc::indoc;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SNAPSHOT: &str = indoc! {r#"
    {
      "works": [{ "id": "W1", "regional": "Sul" }, { "id": "W2", "regional": "Norte" }],
      "ocs": [
        { "id": "OC1", "work_id": "W1", "description": "Concreto usinado", "value": 1000.0,
          "status": "Aprovado",
          "financial_records": [{ "id": "f1", "invoiceNumber": "NF-1", "value": 950.0 }] },
        { "id": "OC2", "work_id": "W2", "description": "Pintura", "value": 500.0 },
        { "id": "OC3", "work_id": "", "description": "Locação de andaime", "value": 0.0 }
      ],
      "events": [
        { "id": "e1", "oc_id": "OC1", "description": "Entrega", "start_date": "2024-01-01", "end_date": "2024-01-05" },
        { "id": "e2", "oc_id": "OC2", "description": "Vistoria elétrica", "start_date": "2024-01-01", "end_date": "2024-03-01" }
      ],
      "users": [{ "id": "u1", "fullName": "Ana Reis" }, { "id": "u2", "fullName": "Bruno Dias" }],
      "rds": {
        "u1": {
          "2024-01": { "operation": "A", "invoiceData": { "value": "R$ 100,00" }, "totalMinutes": 90 }
        },
        "u2": {
          "2024-02": { "operation": "A", "invoiceData": { "value": "R$ 50,00" } }
        }
      },
      "operations": [{ "name": "A", "subOperations": [{ "cte": 1, "contabil": "100", "obra": "Obra A" }] }]
    }
"#};

struct Fixture {
    dir: TempDir,
    snapshot: PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("snapshot.json");
    fs::write(&snapshot, SNAPSHOT).unwrap();
    Fixture { dir, snapshot }
}

fn canteiro(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("canteiro").unwrap();
    cmd.current_dir(cwd).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().clone();
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_tower_list_with_query_matches_events() {
    let fx = fixture();
    let out = stdout_of(canteiro(fx.dir.path()).args([
        "tower",
        "--snapshot",
        fx.snapshot.to_str().unwrap(),
        "--query",
        "elétrica",
    ]));

    assert!(out.contains("OC2"), "{out}");
    assert!(!out.contains("OC1"), "{out}");
    assert!(out.contains("Page 1 of 1 (1 items)"), "{out}");
}

#[test]
fn test_tower_overdue_at_fixed_instant() {
    let fx = fixture();
    let out = stdout_of(canteiro(fx.dir.path()).args([
        "tower",
        "-s",
        fx.snapshot.to_str().unwrap(),
        "--overdue",
        "--now",
        "2024-01-10",
    ]));

    assert!(out.contains("OC1"), "{out}");
    assert!(!out.contains("OC2"), "{out}");
    assert!(out.contains("95.0%"), "{out}");
}

#[test]
fn test_tower_grouped_and_no_results() {
    let fx = fixture();
    let grouped = stdout_of(canteiro(fx.dir.path()).args([
        "tower",
        "-s",
        fx.snapshot.to_str().unwrap(),
        "--view",
        "grouped",
    ]));
    assert!(grouped.contains("Sem Obra"), "{grouped}");

    let empty = stdout_of(canteiro(fx.dir.path()).args([
        "tower",
        "-s",
        fx.snapshot.to_str().unwrap(),
        "--status",
        "Cancelado",
    ]));
    assert!(empty.contains("No results"), "{empty}");
}

#[test]
fn test_tower_applies_edits() {
    let fx = fixture();
    let edits = fx.dir.path().join("edits.json");
    fs::write(
        &edits,
        r#"[{ "kind": "delete_oc", "oc_id": "OC2" }]"#,
    )
    .unwrap();

    let out = stdout_of(canteiro(fx.dir.path()).args([
        "tower",
        "-s",
        fx.snapshot.to_str().unwrap(),
        "--edits",
        edits.to_str().unwrap(),
    ]));
    assert!(!out.contains("OC2"), "{out}");
    assert!(out.contains("(2 items)"), "{out}");
}

#[test]
fn test_costs_json_totals() {
    let fx = fixture();
    let out = stdout_of(canteiro(fx.dir.path()).args([
        "costs",
        "-s",
        fx.snapshot.to_str().unwrap(),
        "--from",
        "2024-01",
        "--to",
        "2024-02",
        "--format",
        "json",
    ]));

    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["report"]["categories"]["A"]["total"], 150.0);
    assert_eq!(json["ranking"][0]["name"], "A");
    assert_eq!(json["report"]["months_covered"][1], "2024-02");
}

#[test]
fn test_costs_rejects_inverted_range() {
    let fx = fixture();
    canteiro(fx.dir.path())
        .args([
            "costs",
            "-s",
            fx.snapshot.to_str().unwrap(),
            "--from",
            "2024-03",
            "--to",
            "2024-01",
        ])
        .assert()
        .failure();
}

#[test]
fn test_hours_for_month() {
    let fx = fixture();
    let out = stdout_of(canteiro(fx.dir.path()).args([
        "hours",
        "-s",
        fx.snapshot.to_str().unwrap(),
        "--year",
        "2024",
        "--month",
        "1",
    ]));
    assert!(out.contains("Obra A"), "{out}");
    assert!(out.contains("1:30"), "{out}");
}

#[test]
fn test_alerts_round_trip() {
    let fx = fixture();
    let store = fx.dir.path().join("alerts.json");
    let store_arg = store.to_str().unwrap();

    canteiro(fx.dir.path())
        .args([
            "alerts", "--store", store_arg, "set", "--id", "a1", "--work", "W1", "--event",
            "Entrega", "--lead", "3",
        ])
        .assert()
        .success();

    let listed = stdout_of(canteiro(fx.dir.path()).args(["alerts", "--store", store_arg, "list"]));
    assert!(listed.contains("a1"), "{listed}");
    assert!(listed.contains("3d"), "{listed}");

    canteiro(fx.dir.path())
        .args(["alerts", "--store", store_arg, "remove", "a1"])
        .assert()
        .success();
    let listed = stdout_of(canteiro(fx.dir.path()).args(["alerts", "--store", store_arg, "list"]));
    assert!(listed.contains("No results"), "{listed}");
}

#[test]
fn test_invalid_explicit_config_fails() {
    let fx = fixture();
    let config = fx.dir.path().join("bad.toml");
    fs::write(&config, "[pagination]\nitems_per_page = 0\n").unwrap();

    canteiro(fx.dir.path())
        .args([
            "tower",
            "-s",
            fx.snapshot.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .assert()
        .failure();
}

#[test]
fn test_init_writes_config() {
    let fx = fixture();
    canteiro(fx.dir.path()).arg("init").assert().success();
    let written = fs::read_to_string(fx.dir.path().join(".canteiro.toml")).unwrap();
    assert!(written.contains("items_per_page = 20"));
}
