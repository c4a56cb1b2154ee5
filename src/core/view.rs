//! Derived views over the reconciled records: filters, KPIs and progress per
//! responsible.

use crate::models::record::LocationRecord;
use crate::models::roster::{NO_RESPONSIBLE, Region};
use serde::Serialize;
use std::collections::BTreeMap;

/// Label under which unassigned locations are grouped.
pub const UNASSIGNED: &str = "SIN ASIGNAR";

#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub group: Option<Region>,
    pub search: Option<String>,
    pub pending_only: bool,
}

impl Filter {
    pub fn matches(&self, record: &LocationRecord) -> bool {
        if let Some(group) = self.group
            && record.group != group
        {
            return false;
        }

        if let Some(term) = &self.search {
            let term = term.trim().to_lowercase();
            if !term.is_empty()
                && !record.name.to_lowercase().contains(&term)
                && !record.responsible.to_lowercase().contains(&term)
            {
                return false;
            }
        }

        !(self.pending_only && record.is_complete())
    }

    pub fn apply<'a>(&self, records: &'a [LocationRecord]) -> Vec<&'a LocationRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Kpis {
    /// Completed activities over all activities, rounded percent.
    pub completion_pct: u32,
    pub complete_locations: usize,
    pub pending_locations: usize,
    /// Locations with a non-empty note.
    pub alerts: usize,
}

pub fn kpis(records: &[&LocationRecord]) -> Kpis {
    if records.is_empty() {
        return Kpis::default();
    }

    let possible: usize = records.iter().map(|r| r.total()).sum();
    let done: usize = records.iter().map(|r| r.completed()).sum();
    let complete = records.iter().filter(|r| r.is_complete()).count();

    Kpis {
        completion_pct: percent(done, possible),
        complete_locations: complete,
        pending_locations: records.len() - complete,
        alerts: records.iter().filter(|r| r.has_alert()).count(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponsibleProgress {
    pub responsible: String,
    pub completed: usize,
    pub total: usize,
    pub locations: Vec<String>,
}

impl ResponsibleProgress {
    pub fn percent(&self) -> u32 {
        percent(self.completed, self.total)
    }
}

/// Progress grouped by responsible, least advanced first.
pub fn progress_by_responsible(records: &[&LocationRecord]) -> Vec<ResponsibleProgress> {
    let mut groups: BTreeMap<String, ResponsibleProgress> = BTreeMap::new();

    for record in records {
        let name = match record.responsible.trim() {
            "" | NO_RESPONSIBLE => UNASSIGNED.to_string(),
            other => other.to_string(),
        };

        let entry = groups
            .entry(name.clone())
            .or_insert_with(|| ResponsibleProgress {
                responsible: name,
                completed: 0,
                total: 0,
                locations: Vec::new(),
            });
        entry.completed += record.completed();
        entry.total += record.total();
        entry.locations.push(record.name.clone());
    }

    let mut out: Vec<ResponsibleProgress> = groups.into_values().collect();
    // compare completed/total ratios without floats
    out.sort_by(|a, b| {
        (a.completed * b.total.max(1))
            .cmp(&(b.completed * a.total.max(1)))
            .then_with(|| a.responsible.cmp(&b.responsible))
    });
    out
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}
