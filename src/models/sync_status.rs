use serde::Serialize;
use std::fmt;

/// Connectivity state of the engine, consumed by the view.
///
/// `Loading` is the only initial state; none is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncStatus {
    Loading,
    Offline,
    Synced,
    Error,
}

impl SyncStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SyncStatus::Loading => "loading",
            SyncStatus::Offline => "offline",
            SyncStatus::Synced => "synced",
            SyncStatus::Error => "error",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
