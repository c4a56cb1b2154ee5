use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{ctk, init_db, setup_test_db, temp_out};

const PERIOD: &str = "abril-2025";

#[test]
fn test_init_creates_store() {
    let db_path = setup_test_db("cli_init");

    ctk()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("initialization completed"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_check_then_list_shows_progress() {
    let db_path = setup_test_db("cli_check_list");
    init_db(&db_path);

    ctk()
        .args(["--db", &db_path, "--period", PERIOD, "check", "001", "1"])
        .assert()
        .success()
        .stdout(contains("(saved)"));

    ctk()
        .args(["--db", &db_path, "--period", PERIOD, "list", "--search", "principal"])
        .assert()
        .success()
        .stdout(contains("001 CARIBE - PRINCIPAL").and(contains("1/10 (10%)")));

    // a different period is untouched
    ctk()
        .args(["--db", &db_path, "--period", "mayo-2025", "list", "--search", "principal"])
        .assert()
        .success()
        .stdout(contains("0/10 (0%)"));
}

#[test]
fn test_check_off_reverts_activity() {
    let db_path = setup_test_db("cli_check_off");
    init_db(&db_path);

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "check", "003", "motivos"])
        .assert()
        .success();

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "check", "003", "motivos", "--off"])
        .assert()
        .success()
        .stdout(contains("pending"));

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "list", "--search", "centro"])
        .assert()
        .success()
        .stdout(contains("0/10 (0%)"));
}

#[test]
fn test_note_and_assign() {
    let db_path = setup_test_db("cli_note_assign");
    init_db(&db_path);

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "note", "004", "faltan soportes"])
        .assert()
        .success()
        .stdout(contains("(saved)"));

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "assign", "004", "laura gomez"])
        .assert()
        .success()
        .stdout(contains("LAURA GOMEZ"));

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "list", "--group", "cauca"])
        .assert()
        .success()
        .stdout(
            contains("faltan soportes")
                .and(contains("LAURA GOMEZ"))
                .and(contains("BUGA").not()),
        );
}

#[test]
fn test_summary_reports_kpis() {
    let db_path = setup_test_db("cli_summary");
    init_db(&db_path);

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "note", "005", "revisar"])
        .assert()
        .success();

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "summary"])
        .assert()
        .success()
        .stdout(
            contains("Alerts    : 1")
                .and(contains("Pending   : 16"))
                .and(contains("SIN ASIGNAR")),
        );
}

#[test]
fn test_reset_with_yes_clears_period() {
    let db_path = setup_test_db("cli_reset");
    init_db(&db_path);

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "check", "009", "2"])
        .assert()
        .success();

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "reset", "--yes"])
        .assert()
        .success()
        .stdout(contains("has been reset"));

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "list", "--pending"])
        .assert()
        .success()
        .stdout(contains("009 CARIBE - PANAMERICANA").and(contains("1/10").not()));
}

#[test]
fn test_reset_declined_keeps_data() {
    let db_path = setup_test_db("cli_reset_declined");
    init_db(&db_path);

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "check", "010", "1"])
        .assert()
        .success();

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "reset"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled"));

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "list", "--search", "010"])
        .assert()
        .success()
        .stdout(contains("1/10 (10%)"));
}

#[test]
fn test_export_csv() {
    let db_path = setup_test_db("cli_export_csv");
    let out = temp_out("cli_export_csv", "csv");
    init_db(&db_path);

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "check", "013", "ajuste_al_costo"])
        .assert()
        .success();

    ctk()
        .args([
            "--db", &db_path, "-p", PERIOD, "export", "--format", "csv", "--file", &out,
        ])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).expect("csv written");
    let mut lines = content.lines();
    let header = lines.next().expect("header");
    assert!(header.starts_with("period,location_id,name,group,responsible,revision_bod_transito"));
    assert!(header.ends_with("ajuste_al_costo,completed,note"));
    assert_eq!(content.lines().count(), 17);

    let el_retiro = content
        .lines()
        .find(|l| l.contains("loc-013"))
        .expect("loc-013 row");
    assert!(el_retiro.contains(",0,0,0,0,0,0,0,0,0,1,1/10,"));
}

#[test]
fn test_export_json_by_group() {
    let db_path = setup_test_db("cli_export_json");
    let out = temp_out("cli_export_json", "json");
    init_db(&db_path);

    ctk()
        .args([
            "--db", &db_path, "-p", PERIOD, "export", "--format", "json", "--file", &out,
            "--group", "antioquia",
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("json written");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let rows = parsed.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["location_id"], "loc-013");
    assert_eq!(rows[0]["period"], "abril 2025");
    assert_eq!(rows[0]["total"], 10);
}

#[test]
fn test_export_refuses_overwrite_without_force() {
    let db_path = setup_test_db("cli_export_force");
    let out = temp_out("cli_export_force", "csv");
    init_db(&db_path);
    fs::write(&out, "keep me").expect("seed file");

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "export", "--file", &out])
        .write_stdin("n\n")
        .assert()
        .failure();
    assert_eq!(fs::read_to_string(&out).expect("read"), "keep me");

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "export", "--file", &out, "--force"])
        .assert()
        .success();
    assert!(fs::read_to_string(&out).expect("read").starts_with("period,"));
}

#[test]
fn test_offline_mode_does_not_persist() {
    let db_path = setup_test_db("cli_offline");
    init_db(&db_path);

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "--offline", "check", "001", "1"])
        .assert()
        .success()
        .stdout(contains("Offline").and(contains("not persisted")));

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "list", "--search", "principal"])
        .assert()
        .success()
        .stdout(contains("0/10 (0%)"));
}

#[test]
fn test_unknown_location_fails() {
    let db_path = setup_test_db("cli_unknown_location");
    init_db(&db_path);

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "check", "777", "1"])
        .assert()
        .failure()
        .stderr(contains("Unknown location"));
}

#[test]
fn test_invalid_period_fails() {
    let db_path = setup_test_db("cli_invalid_period");
    init_db(&db_path);

    ctk()
        .args(["--db", &db_path, "-p", "brumario-2025", "list"])
        .assert()
        .failure()
        .stderr(contains("Invalid period"));
}

#[test]
fn test_config_print() {
    ctk()
        .args(["--db", "/tmp/closetrack_cfg_print.sqlite", "config", "--print"])
        .assert()
        .success()
        .stdout(contains("remote_database").and(contains("echo_window_ms")));
}

#[test]
fn test_assign_rejects_blank_name() {
    let db_path = setup_test_db("cli_assign_blank");
    init_db(&db_path);

    ctk()
        .args(["--db", &db_path, "-p", PERIOD, "assign", "001", "   "])
        .assert()
        .failure()
        .stderr(contains("Invalid responsible"));
}

#[test]
fn test_unreachable_store_is_reported_as_error() {
    let missing = std::env::temp_dir()
        .join("closetrack_missing_dir_for_cli")
        .join("shared.sqlite");
    fs::remove_dir_all(missing.parent().expect("parent")).ok();
    let missing = missing.to_string_lossy().to_string();

    ctk()
        .args(["--db", &missing, "-p", PERIOD, "list", "--search", "principal"])
        .assert()
        .success()
        .stderr(contains("Remote store error"))
        .stdout(contains("001 CARIBE - PRINCIPAL").and(contains("Offline").not()));
}
