#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use closetrack::core::{EngineOptions, ReconciliationEngine};
use closetrack::gateway::RemoteGateway;
use closetrack::models::period::{Month, Period};
use closetrack::models::roster::{Activity, Region, Roster, RosterLocation};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Binary under test, isolated from the user's home and environment.
pub fn ctk() -> Command {
    let mut cmd = cargo_bin_cmd!("closetrack");
    let home = env::temp_dir().join("closetrack_test_home");
    fs::create_dir_all(&home).ok();
    cmd.env("HOME", &home)
        .env("USERPROFILE", &home)
        .env_remove("CLOSETRACK_REMOTE")
        .env_remove("RUST_LOG");
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_closetrack.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the store schema through the CLI
pub fn init_db(db_path: &str) {
    ctk()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

pub fn april() -> Period {
    Period::new(Month::Abril, 2025)
}

pub fn may() -> Period {
    Period::new(Month::Mayo, 2025)
}

/// Two locations, two activities: small enough to assert whole records.
pub fn small_roster() -> Arc<Roster> {
    let roster = Roster::new(
        vec![
            RosterLocation::new("001 NORTE", "ANA", Region::Valle),
            RosterLocation::new("002 SUR", "LUIS", Region::Cauca),
        ],
        vec![
            Activity {
                key: "a".into(),
                label: "Activity A".into(),
            },
            Activity {
                key: "b".into(),
                label: "Activity B".into(),
            },
        ],
    )
    .expect("valid roster");
    Arc::new(roster)
}

pub fn engine_with(
    roster: Arc<Roster>,
    gateway: Option<Arc<dyn RemoteGateway>>,
    period: Period,
    client: &str,
) -> ReconciliationEngine {
    ReconciliationEngine::new(
        roster,
        gateway,
        period,
        EngineOptions {
            client_id: client.to_string(),
            echo_window: Duration::from_secs(3),
        },
    )
}
