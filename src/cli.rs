pub mod parser;

pub mod commands {
    pub mod assign;
    pub mod check;
    pub mod config;
    pub mod export;
    pub mod init;
    pub mod list;
    pub mod note;
    pub mod reset;
    pub mod summary;
    pub mod watch;

    use crate::cli::parser::Cli;
    use crate::config::Config;
    use crate::core::ReconciliationEngine;
    use crate::core::session::open_engine;
    use crate::errors::{AppError, AppResult};
    use crate::models::period::Period;
    use crate::models::roster::Region;
    use crate::models::sync_status::SyncStatus;
    use crate::models::record::RecordChange;
    use crate::ui::messages::{error, success, warning};

    /// Period selected on the command line, or the current month.
    pub(crate) fn selected_period(cli: &Cli) -> AppResult<Period> {
        match &cli.period {
            Some(p) => Period::parse(p),
            None => Ok(Period::current()),
        }
    }

    pub(crate) fn parse_group(group: &Option<String>) -> AppResult<Option<Region>> {
        group
            .as_deref()
            .map(|g| Region::parse(g).ok_or_else(|| AppError::Config(format!("Unknown group '{g}'"))))
            .transpose()
    }

    /// Open and load the engine for the selected period, reporting a failed
    /// remote load without aborting.
    pub(crate) async fn open(cli: &Cli, cfg: &Config) -> AppResult<ReconciliationEngine> {
        let period = selected_period(cli)?;
        let engine = open_engine(cfg, period, cli.offline).await?;
        report_status(&engine);
        Ok(engine)
    }

    pub(crate) fn report_status(engine: &ReconciliationEngine) {
        match engine.status() {
            SyncStatus::Error => error(format!(
                "Remote store error: {}",
                engine.last_error().unwrap_or("unknown error")
            )),
            SyncStatus::Offline => warning("Offline: showing roster defaults, changes are not persisted."),
            SyncStatus::Loading | SyncStatus::Synced => {}
        }
    }

    /// Apply one change through the engine and wait for the store's answer.
    pub(crate) async fn apply_change(
        engine: &mut ReconciliationEngine,
        location_id: &str,
        change: RecordChange,
        what: &str,
    ) {
        engine.update(location_id, change);
        engine.settle().await;

        match engine.status() {
            SyncStatus::Synced => success(format!("{what} (saved)")),
            SyncStatus::Offline => warning(format!("{what} (offline, not persisted)")),
            SyncStatus::Error => error(format!(
                "{what} (not saved: {})",
                engine.last_error().unwrap_or("unknown error")
            )),
            SyncStatus::Loading => {}
        }
    }
}
