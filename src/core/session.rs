//! Builds an engine from the configuration: roster, gateway and options.

use super::engine::{EngineOptions, ReconciliationEngine};
use crate::config::Config;
use crate::errors::AppResult;
use crate::gateway::{RemoteGateway, SqliteGateway};
use crate::models::period::Period;
use crate::models::roster::Roster;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

pub fn load_roster(cfg: &Config) -> AppResult<Roster> {
    match &cfg.roster_file {
        Some(path) => Roster::from_yaml_file(Path::new(path)),
        None => Ok(Roster::caribe()),
    }
}

/// The configured gateway, or `None` for offline mode.
///
/// A configured store that cannot be opened yet is still returned: it
/// connects on first use, so the engine reports the failure as `Error` and a
/// later refresh can recover.
pub fn open_gateway(cfg: &Config, offline: bool) -> Option<Arc<dyn RemoteGateway>> {
    if offline {
        return None;
    }
    let path = cfg.remote_database.as_deref()?;

    let gateway = SqliteGateway::open(path, cfg.poll_interval()).unwrap_or_else(|e| {
        warn!(path, error = %e, "cannot open remote store, will retry");
        SqliteGateway::lazy(path, cfg.poll_interval())
    });
    Some(Arc::new(gateway))
}

/// A loaded engine for `period`.
pub async fn open_engine(
    cfg: &Config,
    period: Period,
    offline: bool,
) -> AppResult<ReconciliationEngine> {
    let roster = Arc::new(load_roster(cfg)?);
    let gateway = open_gateway(cfg, offline);

    let options = EngineOptions {
        echo_window: cfg.echo_window(),
        ..Default::default()
    };

    let mut engine = ReconciliationEngine::new(roster, gateway, period, options);
    engine.start().await;
    Ok(engine)
}
