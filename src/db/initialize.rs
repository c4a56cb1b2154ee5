use rusqlite::{Connection, Result};

/// Create the shared-store schema if it does not exist yet.
///
/// `change_feed` is filled by triggers so that every writer, including
/// external tools, produces push notifications for subscribers. Entries are
/// stamped with their unix time so pollers can prune them by age.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS closing_rows (
            id            TEXT PRIMARY KEY,
            month         TEXT NOT NULL,
            year          INTEGER NOT NULL,
            location_id   TEXT NOT NULL,
            activities    TEXT,
            observation   TEXT,
            responsible   TEXT,
            updated_at    TEXT NOT NULL,
            origin_client TEXT,
            origin_seq    INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_closing_rows_period ON closing_rows(month, year);

        CREATE TABLE IF NOT EXISTS change_feed (
            seq           INTEGER PRIMARY KEY AUTOINCREMENT,
            row_id        TEXT NOT NULL,
            month         TEXT NOT NULL,
            year          INTEGER NOT NULL,
            location_id   TEXT NOT NULL,
            activities    TEXT,
            observation   TEXT,
            responsible   TEXT,
            updated_at    TEXT NOT NULL,
            origin_client TEXT,
            origin_seq    INTEGER,
            recorded_at   INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER))
        );

        CREATE INDEX IF NOT EXISTS idx_change_feed_recorded ON change_feed(recorded_at);

        CREATE TRIGGER IF NOT EXISTS trg_closing_rows_insert
        AFTER INSERT ON closing_rows
        BEGIN
            INSERT INTO change_feed (row_id, month, year, location_id, activities,
                                     observation, responsible, updated_at,
                                     origin_client, origin_seq)
            VALUES (NEW.id, NEW.month, NEW.year, NEW.location_id, NEW.activities,
                    NEW.observation, NEW.responsible, NEW.updated_at,
                    NEW.origin_client, NEW.origin_seq);
        END;

        CREATE TRIGGER IF NOT EXISTS trg_closing_rows_update
        AFTER UPDATE ON closing_rows
        BEGIN
            INSERT INTO change_feed (row_id, month, year, location_id, activities,
                                     observation, responsible, updated_at,
                                     origin_client, origin_seq)
            VALUES (NEW.id, NEW.month, NEW.year, NEW.location_id, NEW.activities,
                    NEW.observation, NEW.responsible, NEW.updated_at,
                    NEW.origin_client, NEW.origin_seq);
        END;
        "#,
    )?;
    Ok(())
}
