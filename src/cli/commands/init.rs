use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;
use crate::gateway::SqliteGateway;
use crate::ui::messages::success;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and configuration file (skipped in test mode)
///  - the shared store schema (rows table, change feed, triggers)
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let db_path = cli
        .db
        .clone()
        .or_else(|| cfg.remote_database.clone())
        .unwrap_or_else(|| Config::database_file().to_string_lossy().to_string());

    println!("⚙️  Initializing closetrack…");

    if !cli.test {
        let mut new_cfg = cfg.clone();
        new_cfg.remote_database = Some(db_path.clone());
        let path = Config::config_file();
        new_cfg.save_to(&path)?;
        println!("📄 Config file : {}", path.display());
    }

    if let Some(dir) = std::path::Path::new(&db_path).parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)?;
    }

    SqliteGateway::open(&db_path, cfg.poll_interval())?;
    println!("🗄️  Store       : {}", &db_path);

    success("closetrack initialization completed!");
    Ok(())
}
