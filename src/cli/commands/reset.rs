use crate::cli::commands::open;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::sync_status::SyncStatus;
use crate::ui::messages::{confirm, error, info, success, warning};

pub async fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Reset { yes } = &cli.command {
        let mut engine = open(cli, cfg).await?;
        let period = engine.period();

        let confirmed = *yes || {
            warning(format!(
                "Reset ALL locations for {period}? Every check, note and assignment of the period is discarded for every operator."
            ));
            confirm("Confirm")
        };

        if !engine.reset_period(confirmed).await {
            info("Operation cancelled.");
            return Ok(());
        }

        match engine.status() {
            SyncStatus::Synced => success(format!("Period {period} has been reset.")),
            SyncStatus::Offline => warning("Offline: nothing to reset in the shared store."),
            _ => error(format!(
                "Reset failed: {}",
                engine.last_error().unwrap_or("unknown error")
            )),
        }
    }
    Ok(())
}
