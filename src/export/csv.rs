use super::model::RecordExport;
use crate::errors::AppResult;
use crate::models::roster::Roster;
use csv::Writer;
use std::path::Path;

/// Scrive i record in CSV: una colonna per attività, in ordine di roster.
pub fn write_csv(path: &Path, roster: &Roster, rows: &[RecordExport]) -> AppResult<()> {
    let mut wtr = Writer::from_path(path)?;

    let mut header = vec![
        "period".to_string(),
        "location_id".to_string(),
        "name".to_string(),
        "group".to_string(),
        "responsible".to_string(),
    ];
    header.extend(roster.activities().iter().map(|a| a.key.clone()));
    header.extend(["completed".to_string(), "note".to_string()]);
    wtr.write_record(&header)?;

    for row in rows {
        let mut record = vec![
            row.period.clone(),
            row.location_id.clone(),
            row.name.clone(),
            row.group.clone(),
            row.responsible.clone(),
        ];
        record.extend(
            row.activities
                .iter()
                .map(|a| if a.done { "1" } else { "0" }.to_string()),
        );
        record.push(format!("{}/{}", row.completed, row.total));
        record.push(row.note.clone());
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
