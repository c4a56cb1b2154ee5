use crate::cli::commands::{open, parse_group};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::view::{Filter, kpis, progress_by_responsible};
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::colors::{progress, status_badge};
use crate::utils::table::{Column, Table};

pub async fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Summary { group } = &cli.command {
        let filter = Filter {
            group: parse_group(group)?,
            ..Default::default()
        };

        let engine = open(cli, cfg).await?;
        let records = filter.apply(engine.records());
        let k = kpis(&records);

        header(format!(
            "Summary {} {}",
            engine.period(),
            status_badge(engine.status())
        ));
        println!("Progress  : {}%", k.completion_pct);
        println!("Complete  : {}", k.complete_locations);
        println!("Pending   : {}", k.pending_locations);
        println!("Alerts    : {}", k.alerts);
        println!();

        let mut table = Table::new(vec![
            Column::new("Responsible"),
            Column::new("Locations"),
            Column::new("Progress"),
        ]);
        for p in progress_by_responsible(&records) {
            table.add_row(vec![
                p.responsible.clone(),
                p.locations.len().to_string(),
                progress(p.completed, p.total, p.percent()),
            ]);
        }
        println!("{}", table.render());
    }
    Ok(())
}
