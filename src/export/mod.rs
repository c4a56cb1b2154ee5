// src/export/mod.rs

mod csv;
mod fs_utils;
mod json;
mod model;

pub use model::RecordExport;

use crate::errors::{AppError, AppResult};
use crate::models::period::Period;
use crate::models::record::LocationRecord;
use crate::models::roster::Roster;
use crate::ui::messages::{success, warning};
use clap::ValueEnum;
use std::io;
use std::path::Path;

/// Helper comune per messaggi di completamento export.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Write `records` of `period` to `file`.
///
/// Existing files are only replaced with `force` or after confirmation.
pub fn export_records(
    roster: &Roster,
    period: Period,
    records: &[&LocationRecord],
    format: ExportFormat,
    file: &str,
    force: bool,
) -> AppResult<()> {
    let path = Path::new(file);

    if file.trim().is_empty() {
        return Err(AppError::from(io::Error::other("Output file path is empty")));
    }

    fs_utils::ensure_writable(path, force)?;

    if records.is_empty() {
        warning("No locations match the selected filters.");
    }

    let rows: Vec<RecordExport> = records
        .iter()
        .map(|r| RecordExport::from_record(roster, period, r))
        .collect();

    match format {
        ExportFormat::Csv => csv::write_csv(path, roster, &rows)?,
        ExportFormat::Json => json::write_json(path, &rows)?,
    }

    notify_export_success(&format.as_str().to_uppercase(), path);
    Ok(())
}
