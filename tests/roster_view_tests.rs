use closetrack::config::Config;
use closetrack::core::store::RecordStore;
use closetrack::core::view::{Filter, UNASSIGNED, kpis, progress_by_responsible};
use closetrack::models::period::{Month, Period};
use closetrack::models::record::{LocationRecord, RecordChange};
use closetrack::models::roster::{NO_RESPONSIBLE, Region, Roster};
use pretty_assertions::assert_eq;

fn caribe_records() -> Vec<LocationRecord> {
    let roster = Roster::caribe();
    RecordStore::from_roster(&roster, Period::new(Month::Abril, 2025))
        .records()
        .to_vec()
}

fn complete(record: &LocationRecord) -> LocationRecord {
    let mut next = record.clone();
    for done in next.activity_state.values_mut() {
        *done = true;
    }
    next
}

#[test]
fn test_period_parse_forms() {
    let expected = Period::new(Month::Abril, 2025);
    assert_eq!(Period::parse("abril-2025").expect("name-year"), expected);
    assert_eq!(Period::parse("ABRIL 2025").expect("upper case"), expected);
    assert_eq!(Period::parse("2025-04").expect("iso"), expected);
    assert_eq!(Period::parse("04/2025").expect("number-year"), expected);

    assert!(Period::parse("abril").is_err());
    assert!(Period::parse("2025-13").is_err());
    assert!(Period::parse("brumario-2025").is_err());
}

#[test]
fn test_period_identity() {
    let period = Period::new(Month::Septiembre, 2025);
    assert_eq!(period.composite_id("loc-001"), "septiembre-2025-loc-001");
    assert!(period.matches("septiembre", 2025));
    assert!(!period.matches("Septiembre", 2025));
    assert!(!period.matches("septiembre", 2024));
    assert_eq!(period.to_string(), "septiembre 2025");
}

#[test]
fn test_caribe_roster_shape() {
    let roster = Roster::caribe();
    assert_eq!(roster.locations().len(), 16);
    assert_eq!(roster.activities().len(), 10);
    assert_eq!(roster.activities()[0].key, "revision_bod_transito");

    let first = &roster.locations()[0];
    assert_eq!(first.id, "loc-001");
    assert_eq!(first.group, Region::Valle);
}

#[test]
fn test_roster_resolution() {
    let roster = Roster::caribe();

    assert_eq!(roster.resolve_location("001").expect("code").id, "loc-001");
    assert_eq!(roster.resolve_location("loc-013").expect("id").id, "loc-013");
    assert_eq!(
        roster
            .resolve_location("010 caribe - buga")
            .expect("name")
            .id,
        "loc-010"
    );
    assert!(roster.resolve_location("999").is_err());

    assert_eq!(roster.resolve_activity("2").expect("index").key, "consumos_internos");
    assert_eq!(roster.resolve_activity("motivos").expect("key").key, "motivos");
    assert!(roster.resolve_activity("0").is_err());
    assert!(roster.resolve_activity("11").is_err());
}

#[test]
fn test_roster_from_yaml_rejects_duplicates() {
    let yaml = r#"
locations:
  - name: "100 ALFA"
    responsible: "ANA"
    group: VALLE
  - name: "200 BETA"
    responsible: "LUIS"
    group: CAUCA
    id: "beta"
activities:
  - key: uno
    label: "Uno"
  - key: dos
    label: "Dos"
"#;
    let roster = Roster::from_yaml_str(yaml).expect("valid yaml roster");
    assert_eq!(roster.locations()[0].id, "loc-100");
    assert_eq!(roster.locations()[1].id, "beta");
    assert!(roster.has_activity("dos"));

    let dup = yaml.replace("key: dos", "key: uno");
    assert!(Roster::from_yaml_str(&dup).is_err());
}

#[test]
fn test_record_change_is_shallow_merge() {
    let records = caribe_records();
    let base = &records[0];

    let next = RecordChange::activity("motivos", true).apply_to(base);
    assert_eq!(next.completed(), 1);
    assert_eq!(next.note, base.note);
    assert_eq!(next.responsible, base.responsible);

    let next = RecordChange::activity("unknown", true).apply_to(&next);
    assert_eq!(next.completed(), 1);
    assert_eq!(next.total(), 10);

    let next = RecordChange::note("  ").apply_to(&next);
    assert!(!next.has_alert());
    assert!(RecordChange::default().is_empty());
}

#[test]
fn test_filter_by_group_search_and_pending() {
    let mut records = caribe_records();
    records[0] = complete(&records[0]);

    let cauca = Filter {
        group: Some(Region::Cauca),
        ..Default::default()
    };
    assert_eq!(cauca.apply(&records).len(), 4);

    let search = Filter {
        search: Some("buga".into()),
        ..Default::default()
    };
    let ids: Vec<&str> = search.apply(&records).iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["loc-010", "loc-029"]);

    let by_person = Filter {
        search: Some("quintero".into()),
        ..Default::default()
    };
    assert_eq!(by_person.apply(&records).len(), 1);

    let pending = Filter {
        pending_only: true,
        ..Default::default()
    };
    assert_eq!(pending.apply(&records).len(), 15);
}

#[test]
fn test_kpis() {
    let mut records = caribe_records();
    records[0] = complete(&records[0]);
    records[1] = RecordChange::note("faltan soportes").apply_to(&records[1]);

    let all: Vec<&LocationRecord> = records.iter().collect();
    let k = kpis(&all);
    // 10 of 160 activities
    assert_eq!(k.completion_pct, 6);
    assert_eq!(k.complete_locations, 1);
    assert_eq!(k.pending_locations, 15);
    assert_eq!(k.alerts, 1);

    assert_eq!(kpis(&[]).completion_pct, 0);
}

#[test]
fn test_progress_by_responsible() {
    let mut records = caribe_records();
    records[0] = complete(&records[0]);

    let all: Vec<&LocationRecord> = records.iter().collect();
    let progress = progress_by_responsible(&all);

    // three placeholder locations grouped together
    let unassigned = progress
        .iter()
        .find(|p| p.responsible == UNASSIGNED)
        .expect("unassigned group");
    assert_eq!(unassigned.locations.len(), 3);
    assert!(progress.iter().all(|p| p.responsible != NO_RESPONSIBLE));

    // least advanced first, the complete one last
    let last = progress.last().expect("non-empty");
    assert_eq!(last.responsible, "DIEGO FERNANDO QUINTERO GALLEGO");
    assert_eq!(last.percent(), 100);
    assert_eq!(progress[0].percent(), 0);
}

#[test]
fn test_config_defaults_and_yaml() {
    let cfg = Config::default();
    assert_eq!(cfg.remote_database, None);
    assert_eq!(cfg.echo_window().as_millis(), 3000);
    assert_eq!(cfg.poll_interval().as_millis(), 500);

    let dir = tempfile::TempDir::new().expect("tempdir");
    let path = dir.path().join("closetrack.conf");
    std::fs::write(&path, "remote_database: /tmp/x.sqlite\npoll_interval_ms: 0\n").expect("write");

    let loaded = Config::load_from(&path).expect("load");
    assert_eq!(loaded.remote_database.as_deref(), Some("/tmp/x.sqlite"));
    assert_eq!(loaded.echo_window_ms, 3000);
    assert_eq!(loaded.poll_interval().as_millis(), 10);
}

#[test]
fn test_message_lines_and_header_rule() {
    use closetrack::ui::messages::{Level, render, render_header};
    use closetrack::utils::table::display_width;

    let line = render(Level::Warning, "Offline: showing roster defaults");
    assert!(line.contains("⚠️"));
    assert!(line.ends_with(" Offline: showing roster defaults"));

    let badge = closetrack::utils::colors::status_badge(closetrack::models::sync_status::SyncStatus::Synced);
    let title = format!("Resumen abril 2025 {badge}");
    let rendered = render_header(&title);
    let mut lines = rendered.lines();
    let first = lines.next().expect("title line");
    let rule = lines.next().expect("rule line");

    assert!(first.contains("Resumen abril 2025"));
    assert_eq!(rule.chars().count(), display_width(&title));
    assert!(rule.chars().all(|c| c == '═'));
}
