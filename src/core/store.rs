//! In-memory reconciled record set for the active period.

use crate::models::period::Period;
use crate::models::record::{ActivityState, LocationRecord};
use crate::models::remote::RemoteRow;
use crate::models::roster::Roster;

#[derive(Debug, Clone)]
pub struct RecordStore {
    period: Period,
    records: Vec<LocationRecord>,
}

impl RecordStore {
    /// Roster defaults for `period`, in roster order.
    pub fn from_roster(roster: &Roster, period: Period) -> Self {
        Self {
            period,
            records: roster
                .locations()
                .iter()
                .map(|loc| LocationRecord::from_roster(loc, roster))
                .collect(),
        }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&LocationRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Replace the record with the same id. Returns false (and changes
    /// nothing) when the id is not part of the store.
    pub fn put(&mut self, record: LocationRecord) -> bool {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Overlay a fetched row onto the current record of its location.
    /// Returns false for rows of another period or an unknown location.
    pub fn overlay_row(&mut self, roster: &Roster, row: &RemoteRow) -> bool {
        if !self.period.matches(&row.month, row.year) {
            return false;
        }
        self.overlay(
            roster,
            &row.location_id,
            row.activities.as_ref(),
            row.observation.as_deref(),
            row.responsible.as_deref(),
        )
    }

    /// Replace the remote-owned fields of one record.
    ///
    /// Activities merge key by key (unknown keys ignored, missing keys kept),
    /// a missing note becomes empty and a missing responsible falls back to
    /// the roster value.
    pub fn overlay(
        &mut self,
        roster: &Roster,
        location_id: &str,
        activities: Option<&ActivityState>,
        note: Option<&str>,
        responsible: Option<&str>,
    ) -> bool {
        let Some(loc) = roster.location(location_id) else {
            return false;
        };
        let Some(record) = self.records.iter_mut().find(|r| r.id == location_id) else {
            return false;
        };

        if let Some(activities) = activities {
            record.overlay_activities(activities);
        }
        record.note = note.unwrap_or_default().to_string();
        record.responsible = match responsible {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => loc.responsible.clone(),
        };
        true
    }
}
