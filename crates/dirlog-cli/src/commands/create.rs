//! The `dirlog --create` command.

use anyhow::{Context, Result};

use dirlog_core::config::load_config;
use dirlog_core::naming::RunMode;
use dirlog_core::{Session, SessionOptions};

pub fn execute(name: &str, dev: bool) -> Result<()> {
    let config = load_config().context("failed to load dirlog config")?;
    let mode = if dev { RunMode::Dev } else { RunMode::Normal };
    let options = SessionOptions::from_config(&config, mode);
    tracing::debug!(?options, label = name, "creating experiment directory");

    let session = Session::create(&options, name)
        .with_context(|| format!("failed to create experiment directory for '{name}'"))?;

    println!("{}", session.path().display());
    Ok(())
}
