use crate::models::period::Period;
use crate::models::record::LocationRecord;
use crate::models::roster::Roster;
use serde::Serialize;

/// Flat export row: one location, activities in roster order.
#[derive(Debug, Clone, Serialize)]
pub struct RecordExport {
    pub period: String,
    pub location_id: String,
    pub name: String,
    pub group: String,
    pub responsible: String,
    pub activities: Vec<ActivityExport>,
    pub completed: usize,
    pub total: usize,
    pub note: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityExport {
    pub key: String,
    pub done: bool,
}

impl RecordExport {
    pub fn from_record(roster: &Roster, period: Period, record: &LocationRecord) -> Self {
        Self {
            period: period.to_string(),
            location_id: record.id.clone(),
            name: record.name.clone(),
            group: record.group.to_string(),
            responsible: record.responsible.clone(),
            activities: roster
                .activities()
                .iter()
                .map(|a| ActivityExport {
                    key: a.key.clone(),
                    done: record.activity_state.get(&a.key).copied().unwrap_or(false),
                })
                .collect(),
            completed: record.completed(),
            total: record.total(),
            note: record.note.clone(),
        }
    }
}
