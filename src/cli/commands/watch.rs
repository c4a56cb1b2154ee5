use crate::cli::commands::open;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::{EngineEvent, MergeOutcome};
use crate::errors::AppResult;
use crate::ui::messages::{error, info, warning};
use chrono::Local;

/// Print every change applied from other operators until Ctrl-C.
pub async fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let mut engine = open(cli, cfg).await?;

    if !engine.is_subscribed() {
        warning("No live subscription available; nothing to watch.");
        return Ok(());
    }

    info(format!(
        "Watching {} as {} (Ctrl-C to stop)…",
        engine.period(),
        engine.client_id()
    ));

    loop {
        tokio::select! {
            event = engine.next_message() => match event {
                EngineEvent::Merged { location_id, outcome: MergeOutcome::Applied } => {
                    if let Some(r) = engine.record(&location_id) {
                        println!(
                            "[{}] {} {} | {}/{} | {} | {}",
                            Local::now().format("%H:%M:%S"),
                            r.id,
                            r.name,
                            r.completed(),
                            r.total(),
                            r.responsible,
                            if r.note.is_empty() { "-" } else { r.note.as_str() },
                        );
                    }
                }
                EngineEvent::Persisted { location_id, ok: false } => {
                    error(format!("Write for {location_id} failed"));
                }
                _ => {}
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info("Stopped.");
    Ok(())
}
