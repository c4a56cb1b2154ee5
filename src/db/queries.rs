use crate::errors::GatewayError;
use crate::models::record::ActivityState;
use crate::models::remote::{RemoteRow, WriteOrigin};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::warn;

const ROW_COLUMNS: &str = "id, month, year, location_id, activities, observation, responsible, \
                           updated_at, origin_client, origin_seq";

/// Map a `closing_rows` (or aliased `change_feed`) row.
///
/// Shape problems inside a single row never fail the whole query: an
/// unreadable `activities` blob is treated as absent and an unreadable
/// timestamp as the epoch.
pub fn map_row(row: &Row) -> rusqlite::Result<RemoteRow> {
    let id: String = row.get("id")?;

    let activities: Option<String> = row.get("activities")?;
    let activities = activities.and_then(|raw| {
        serde_json::from_str::<ActivityState>(&raw)
            .map_err(|e| warn!(row = %id, error = %e, "ignoring malformed activities column"))
            .ok()
    });

    let updated_raw: String = row.get("updated_at")?;
    let updated_at = DateTime::parse_from_rfc3339(&updated_raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| {
            warn!(row = %id, value = %updated_raw, "ignoring malformed updated_at");
            DateTime::<Utc>::UNIX_EPOCH
        });

    let origin_client: Option<String> = row.get("origin_client")?;
    let origin_seq: Option<i64> = row.get("origin_seq")?;
    let origin = match (origin_client, origin_seq) {
        (Some(client), Some(seq)) if seq >= 0 => Some(WriteOrigin {
            client,
            seq: seq as u64,
        }),
        _ => None,
    };

    Ok(RemoteRow {
        id,
        month: row.get("month")?,
        year: row.get("year")?,
        location_id: row.get("location_id")?,
        activities,
        observation: row.get("observation")?,
        responsible: row.get("responsible")?,
        updated_at,
        origin,
    })
}

pub fn fetch_rows_by_period(
    conn: &Connection,
    month: &str,
    year: i32,
) -> Result<Vec<RemoteRow>, GatewayError> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {ROW_COLUMNS} FROM closing_rows
         WHERE month = ?1 AND year = ?2
         ORDER BY location_id ASC"
    ))?;

    let rows = stmt.query_map(params![month, year], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_row(conn: &Connection, id: &str) -> Result<Option<RemoteRow>, GatewayError> {
    let mut stmt =
        conn.prepare_cached(&format!("SELECT {ROW_COLUMNS} FROM closing_rows WHERE id = ?1"))?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

/// Insert or replace the row addressed by `row.id`.
pub fn upsert_row(conn: &Connection, row: &RemoteRow) -> Result<(), GatewayError> {
    let activities = row
        .activities
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    let (origin_client, origin_seq) = match &row.origin {
        Some(o) => (Some(o.client.as_str()), Some(o.seq as i64)),
        None => (None, None),
    };

    conn.execute(
        "INSERT INTO closing_rows (id, month, year, location_id, activities, observation,
                                   responsible, updated_at, origin_client, origin_seq)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(id) DO UPDATE SET
             month = excluded.month,
             year = excluded.year,
             location_id = excluded.location_id,
             activities = excluded.activities,
             observation = excluded.observation,
             responsible = excluded.responsible,
             updated_at = excluded.updated_at,
             origin_client = excluded.origin_client,
             origin_seq = excluded.origin_seq",
        params![
            row.id,
            row.month,
            row.year,
            row.location_id,
            activities,
            row.observation,
            row.responsible,
            row.updated_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            origin_client,
            origin_seq,
        ],
    )?;
    Ok(())
}

pub fn delete_rows_by_period(conn: &Connection, month: &str, year: i32) -> Result<usize, GatewayError> {
    let n = conn.execute(
        "DELETE FROM closing_rows WHERE month = ?1 AND year = ?2",
        params![month, year],
    )?;
    Ok(n)
}

/// Highest change-feed sequence written so far (0 on an empty feed).
pub fn feed_cursor(conn: &Connection) -> Result<i64, GatewayError> {
    let seq: i64 = conn.query_row("SELECT IFNULL(MAX(seq), 0) FROM change_feed", [], |row| {
        row.get(0)
    })?;
    Ok(seq)
}

/// Feed entries after `cursor`, in commit order.
pub fn load_feed_since(conn: &Connection, cursor: i64) -> Result<Vec<(i64, RemoteRow)>, GatewayError> {
    let mut stmt = conn.prepare_cached(
        "SELECT seq, row_id AS id, month, year, location_id, activities, observation,
                responsible, updated_at, origin_client, origin_seq
         FROM change_feed
         WHERE seq > ?1
         ORDER BY seq ASC",
    )?;

    let rows = stmt.query_map([cursor], |row| {
        let seq: i64 = row.get("seq")?;
        Ok((seq, map_row(row)?))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Drop feed entries recorded more than `max_age_secs` ago. Returns how
/// many were removed.
///
/// `seq` is AUTOINCREMENT, so pruning never lets a sequence number be reused
/// and live cursors stay valid.
pub fn prune_feed(conn: &Connection, max_age_secs: i64) -> Result<usize, GatewayError> {
    let n = conn.execute(
        "DELETE FROM change_feed
         WHERE recorded_at < CAST(strftime('%s', 'now') AS INTEGER) - ?1",
        [max_age_secs],
    )?;
    Ok(n)
}

pub fn feed_len(conn: &Connection) -> Result<usize, GatewayError> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM change_feed", [], |row| row.get(0))?;
    Ok(n as usize)
}
