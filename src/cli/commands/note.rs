use crate::cli::commands::{apply_change, open};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::record::RecordChange;

pub async fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Note { location, text } = &cli.command {
        let mut engine = open(cli, cfg).await?;
        let loc = engine.roster().resolve_location(location)?.clone();

        let text = text.trim().to_string();
        let what = if text.is_empty() {
            format!("{} → note cleared", loc.name)
        } else {
            format!("{} → note \"{}\"", loc.name, text)
        };
        apply_change(&mut engine, &loc.id, RecordChange::note(text), &what).await;
    }
    Ok(())
}
