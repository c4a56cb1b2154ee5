//! closetrack library root.
//! Exposes the reconciliation engine, the gateways, the CLI parser and the
//! high-level run() function.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod gateway;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use tracing_subscriber::EnvFilter;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli, cfg),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::List { .. } => cli::commands::list::handle(cli, cfg).await,
        Commands::Check { .. } => cli::commands::check::handle(cli, cfg).await,
        Commands::Note { .. } => cli::commands::note::handle(cli, cfg).await,
        Commands::Assign { .. } => cli::commands::assign::handle(cli, cfg).await,
        Commands::Summary { .. } => cli::commands::summary::handle(cli, cfg).await,
        Commands::Reset { .. } => cli::commands::reset::handle(cli, cfg).await,
        Commands::Watch => cli::commands::watch::handle(cli, cfg).await,
        Commands::Export { .. } => cli::commands::export::handle(cli, cfg).await,
    }
}

/// Diagnostics go to stderr; `RUST_LOG` selects the level (default: warn).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();
    init_tracing();

    // 2️⃣ load config once
    let mut cfg = Config::load()?;

    // 3️⃣ command-line store override
    if let Some(custom_db) = &cli.db {
        cfg.remote_database = Some(custom_db.clone());
    }

    // 4️⃣ one logical thread drives the engine and its network tasks
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(dispatch(&cli, &cfg))
}
