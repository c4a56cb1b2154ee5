use crate::cli::commands::{apply_change, open};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::record::RecordChange;

pub async fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Assign {
        location,
        responsible,
    } = &cli.command
    {
        let responsible = responsible.trim().to_uppercase();
        if responsible.is_empty() {
            return Err(AppError::InvalidResponsible("name cannot be empty".into()));
        }

        let mut engine = open(cli, cfg).await?;
        let loc = engine.roster().resolve_location(location)?.clone();

        let what = format!("{} → responsible {}", loc.name, responsible);
        apply_change(&mut engine, &loc.id, RecordChange::responsible(responsible), &what).await;
    }
    Ok(())
}
