use crate::cli::commands::{open, parse_group};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::view::Filter;
use crate::errors::AppResult;
use crate::models::record::LocationRecord;
use crate::models::roster::Roster;
use crate::ui::messages::{header, info};
use crate::utils::colors::{mark, progress, status_badge};
use crate::utils::table::{Column, Table};

pub async fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        group,
        search,
        pending,
    } = &cli.command
    {
        let filter = Filter {
            group: parse_group(group)?,
            search: search.clone(),
            pending_only: *pending,
        };

        let engine = open(cli, cfg).await?;
        let records = filter.apply(engine.records());

        header(format!(
            "Closing checklist {} {}",
            engine.period(),
            status_badge(engine.status())
        ));

        if records.is_empty() {
            info("No locations match the selected filters.");
            return Ok(());
        }

        println!("{}", render_matrix(engine.roster(), &records));
        print_legend(engine.roster());
    }
    Ok(())
}

/// One row per location, one narrow column per activity (numbered as in the
/// legend).
pub fn render_matrix(roster: &Roster, records: &[&LocationRecord]) -> String {
    let mut columns = vec![
        Column::new("ID"),
        Column::new("Location"),
        Column::new("Responsible"),
    ];
    columns.extend(
        (1..=roster.activities().len()).map(|n| Column::new(n.to_string())),
    );
    columns.push(Column::new("Progress"));
    columns.push(Column::new("Note"));

    let mut table = Table::new(columns);

    for record in records {
        let mut row = vec![
            record.id.clone(),
            record.name.clone(),
            record.responsible.clone(),
        ];
        row.extend(roster.activities().iter().map(|a| {
            mark(record.activity_state.get(&a.key).copied().unwrap_or(false))
        }));

        let pct = if record.total() == 0 {
            0
        } else {
            (record.completed() * 100 / record.total()) as u32
        };
        row.push(progress(record.completed(), record.total(), pct));
        row.push(if record.has_alert() {
            format!("⚠ {}", record.note)
        } else {
            String::new()
        });

        table.add_row(row);
    }

    table.render()
}

fn print_legend(roster: &Roster) {
    println!("Activities:");
    for (i, act) in roster.activities().iter().enumerate() {
        println!("  {:>2}. {} ({})", i + 1, act.label, act.key);
    }
}
