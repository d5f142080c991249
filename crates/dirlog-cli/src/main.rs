//! dirlog CLI — create and inspect per-run experiment directories.

use std::process;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{CommandFactory, Parser};

mod commands;

#[derive(Parser)]
#[command(name = "dirlog", version, about = "Directory logging utility for experiment runs")]
struct Cli {
    /// Create a logging directory for the experiment
    #[arg(short, long, value_name = "NAME")]
    create: Option<String>,

    /// Use a fixed dev_ directory instead of a timestamped one
    #[arg(long, requires = "create")]
    dev: bool,

    /// List the experiment directories of a project
    #[arg(short, long, value_name = "PROJECT", conflicts_with = "create")]
    list: Option<String>,

    /// Only runs started strictly after this time
    #[arg(long, requires = "list", value_parser = parse_time)]
    since: Option<NaiveDateTime>,

    /// Only runs started at or before this time
    #[arg(long, requires = "list", value_parser = parse_time)]
    before: Option<NaiveDateTime>,

    /// Show configs and results of the listed runs as a table
    #[arg(long, requires = "list", conflicts_with = "csv")]
    table: bool,

    /// Write configs and results of the listed runs as CSV
    #[arg(long, requires = "list")]
    csv: bool,
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD-HH-MM-SS` or `YYYY-MM-DDTHH:MM:SS`.
fn parse_time(s: &str) -> Result<NaiveDateTime, String> {
    for format in [dirlog_core::naming::TIMESTAMP_FORMAT, "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(t);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("invalid time '{s}', expected YYYY-MM-DD[-HH-MM-SS]"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dirlog=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = if let Some(name) = cli.create {
        commands::create::execute(&name, cli.dev)
    } else if let Some(project) = cli.list {
        let output = if cli.csv {
            commands::list::Output::Csv
        } else if cli.table {
            commands::list::Output::Table
        } else {
            commands::list::Output::Paths
        };
        commands::list::execute(&project, cli.since, cli.before, output)
    } else {
        Cli::command().print_help().map_err(Into::into)
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
