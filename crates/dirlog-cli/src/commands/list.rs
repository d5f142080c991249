//! The `dirlog --list` command.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use comfy_table::{Cell, Table};

use dirlog_core::config::load_config;
use dirlog_core::{collect_records, list_experiments, ExperimentTable};

/// What to print for the matching runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Paths,
    Table,
    Csv,
}

pub fn execute(
    project: &str,
    since: Option<NaiveDateTime>,
    before: Option<NaiveDateTime>,
    output: Output,
) -> Result<()> {
    let config = load_config().context("failed to load dirlog config")?;
    let experiments = list_experiments(
        config.experiments_directory.as_deref(),
        project,
        since,
        before,
    )?;

    if output == Output::Paths {
        for path in &experiments {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let records = collect_records(&experiments)?;
    let table = ExperimentTable::from_records(&records);

    match output {
        Output::Csv => table
            .write_csv(std::io::stdout().lock())
            .context("failed to write CSV")?,
        _ => print_table(&table),
    }

    Ok(())
}

fn print_table(table: &ExperimentTable) {
    if table.is_empty() {
        println!("No experiments found.");
        return;
    }

    let mut out = Table::new();
    out.set_header(table.columns.iter().map(Cell::new));
    for row in table.string_rows() {
        out.add_row(row.into_iter().map(Cell::new));
    }

    println!("{out}");
    eprintln!("{} experiment(s)", table.len());
}
