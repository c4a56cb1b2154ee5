//! Remote row shape and push notifications.

use super::period::Period;
use super::record::{ActivityState, LocationRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag stamped on every row written by an engine: who wrote it and which of
/// that writer's writes it was.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WriteOrigin {
    pub client: String,
    pub seq: u64,
}

/// A persisted row, keyed by `id = "{month}-{year}-{location_id}"`.
///
/// Nullable columns stay `Option` so that rows written by other tools can be
/// overlaid with roster fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRow {
    pub id: String,
    pub month: String,
    pub year: i32,
    pub location_id: String,
    pub activities: Option<ActivityState>,
    pub observation: Option<String>,
    pub responsible: Option<String>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub origin: Option<WriteOrigin>,
}

impl RemoteRow {
    /// Full row for `record` in `period`, stamped with the current time.
    pub fn from_record(period: &Period, record: &LocationRecord, origin: Option<WriteOrigin>) -> Self {
        Self {
            id: period.composite_id(&record.id),
            month: period.month.as_str().to_string(),
            year: period.year,
            location_id: record.id.clone(),
            activities: Some(record.activity_state.clone()),
            observation: Some(record.note.clone()),
            responsible: Some(record.responsible.clone()),
            updated_at: Utc::now(),
            origin,
        }
    }

    /// The content that survives an idempotent replay (no timestamp, no tag).
    pub fn content(&self) -> (Option<&ActivityState>, Option<&str>, Option<&str>) {
        (
            self.activities.as_ref(),
            self.observation.as_deref(),
            self.responsible.as_deref(),
        )
    }
}

/// Notification that one row was inserted or updated in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteChangeEvent {
    pub location_id: String,
    pub month: String,
    pub year: i32,
    pub activities: Option<ActivityState>,
    pub note: Option<String>,
    pub responsible: Option<String>,
    pub server_timestamp: DateTime<Utc>,
    pub origin: Option<WriteOrigin>,
}

impl From<RemoteRow> for RemoteChangeEvent {
    fn from(row: RemoteRow) -> Self {
        Self {
            location_id: row.location_id,
            month: row.month,
            year: row.year,
            activities: row.activities,
            note: row.observation,
            responsible: row.responsible,
            server_timestamp: row.updated_at,
            origin: row.origin,
        }
    }
}
