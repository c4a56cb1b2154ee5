//! Colour helpers for terminal output.
use crate::models::sync_status::SyncStatus;
use ansi_term::Colour;

/// Colour of the sync status badge.
pub fn status_colour(status: SyncStatus) -> Colour {
    match status {
        SyncStatus::Synced => Colour::Green,
        SyncStatus::Error => Colour::Red,
        SyncStatus::Loading => Colour::Yellow,
        SyncStatus::Offline => Colour::Fixed(245), // grigio
    }
}

pub fn status_badge(status: SyncStatus) -> String {
    status_colour(status)
        .bold()
        .paint(format!("● {}", status.label()))
        .to_string()
}

/// Checklist cell: green tick when done, grey dot when pending.
pub fn mark(done: bool) -> String {
    if done {
        Colour::Green.paint("✔").to_string()
    } else {
        Colour::Fixed(245).paint("·").to_string()
    }
}

/// Progress colour: red below 50%, yellow below 80%, green below 100%,
/// blue when complete.
pub fn progress_colour(percent: u32) -> Colour {
    match percent {
        100.. => Colour::Blue,
        80..=99 => Colour::Green,
        50..=79 => Colour::Yellow,
        _ => Colour::Red,
    }
}

pub fn progress(completed: usize, total: usize, percent: u32) -> String {
    progress_colour(percent)
        .paint(format!("{completed}/{total} ({percent}%)"))
        .to_string()
}
