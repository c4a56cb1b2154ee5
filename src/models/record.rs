use super::roster::{Region, Roster, RosterLocation};
use serde::Serialize;
use std::collections::BTreeMap;

/// Activity id -> done. Key set is always the roster's activity set.
pub type ActivityState = BTreeMap<String, bool>;

/// Reconciled state of one location for the active period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationRecord {
    pub id: String,
    pub name: String,
    pub group: Region,
    pub responsible: String,
    pub activity_state: ActivityState,
    pub note: String,
}

impl LocationRecord {
    /// Roster defaults: every activity pending, empty note.
    pub fn from_roster(loc: &RosterLocation, roster: &Roster) -> Self {
        Self {
            id: loc.id.clone(),
            name: loc.name.clone(),
            group: loc.group,
            responsible: loc.responsible.clone(),
            activity_state: roster
                .activities()
                .iter()
                .map(|a| (a.key.clone(), false))
                .collect(),
            note: String::new(),
        }
    }

    /// Set every key of `patch` that already exists in the record.
    /// Returns the number of keys applied; unknown keys are skipped.
    pub fn overlay_activities(&mut self, patch: &ActivityState) -> usize {
        let mut applied = 0;
        for (key, done) in patch {
            if let Some(slot) = self.activity_state.get_mut(key) {
                *slot = *done;
                applied += 1;
            }
        }
        applied
    }

    pub fn completed(&self) -> usize {
        self.activity_state.values().filter(|done| **done).count()
    }

    pub fn total(&self) -> usize {
        self.activity_state.len()
    }

    pub fn is_complete(&self) -> bool {
        self.total() > 0 && self.completed() == self.total()
    }

    /// A non-empty note flags an exception.
    pub fn has_alert(&self) -> bool {
        !self.note.trim().is_empty()
    }
}

/// Partial change requested by the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordChange {
    pub activity_state: Option<ActivityState>,
    pub note: Option<String>,
    pub responsible: Option<String>,
}

impl RecordChange {
    pub fn activity(key: impl Into<String>, done: bool) -> Self {
        let mut patch = ActivityState::new();
        patch.insert(key.into(), done);
        Self {
            activity_state: Some(patch),
            ..Default::default()
        }
    }

    pub fn note(note: impl Into<String>) -> Self {
        Self {
            note: Some(note.into()),
            ..Default::default()
        }
    }

    pub fn responsible(responsible: impl Into<String>) -> Self {
        Self {
            responsible: Some(responsible.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.activity_state.is_none() && self.note.is_none() && self.responsible.is_none()
    }

    /// Shallow merge of `self` onto `record`.
    pub fn apply_to(&self, record: &LocationRecord) -> LocationRecord {
        let mut next = record.clone();
        if let Some(patch) = &self.activity_state {
            next.overlay_activities(patch);
        }
        if let Some(note) = &self.note {
            next.note = note.clone();
        }
        if let Some(responsible) = &self.responsible {
            next.responsible = responsible.clone();
        }
        next
    }
}
