use crate::cli::commands::{open, parse_group};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::view::Filter;
use crate::errors::AppResult;
use crate::export::export_records;

pub async fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        group,
        force,
    } = &cli.command
    {
        let filter = Filter {
            group: parse_group(group)?,
            ..Default::default()
        };

        let engine = open(cli, cfg).await?;
        let records = filter.apply(engine.records());

        export_records(
            engine.roster(),
            engine.period(),
            &records,
            *format,
            file,
            *force,
        )?;
    }
    Ok(())
}
