use crate::cli::commands::{apply_change, open};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::record::RecordChange;

/// Mark one checklist activity of a location as done or pending.
pub async fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Check {
        location,
        activity,
        off,
    } = &cli.command
    {
        let mut engine = open(cli, cfg).await?;

        let loc = engine.roster().resolve_location(location)?.clone();
        let act = engine.roster().resolve_activity(activity)?.clone();
        let done = !*off;

        let what = format!(
            "{} → '{}' {}",
            loc.name,
            act.label,
            if done { "done" } else { "pending" }
        );
        apply_change(&mut engine, &loc.id, RecordChange::activity(act.key, done), &what).await;
    }
    Ok(())
}
