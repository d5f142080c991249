//! Process-wide session facade.
//!
//! The first successful [`createdir`] fixes the session directory for the
//! rest of the process; later calls return that same path and ignore their
//! arguments, even when those disagree with the cached session. Every other
//! helper here resolves paths through [`createdir`], so the first one called
//! decides the directory.
//!
//! Nothing here is reset short of starting a new process.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;
use toml::Table;

use crate::config::load_config;
use crate::document::{CONFIG_FILE, RESULTS_FILE};
use crate::enumerate::list_experiments;
use crate::error::Result;
use crate::logs::{self, LogOptions};
use crate::naming::{default_label, RunMode};
use crate::session::{Session, SessionOptions};

static SESSION: Mutex<Option<Session>> = Mutex::new(None);
static DEV_MODE: AtomicBool = AtomicBool::new(false);

/// Name new session directories `dev_{label}` instead of timestamping them.
///
/// Has no effect once a session directory exists.
pub fn set_dev_mode() {
    DEV_MODE.store(true, Ordering::SeqCst);
}

/// Whether development mode is on.
pub fn is_dev_mode() -> bool {
    DEV_MODE.load(Ordering::SeqCst)
}

fn run_mode() -> RunMode {
    if is_dev_mode() {
        RunMode::Dev
    } else {
        RunMode::Normal
    }
}

/// Create the session directory if this process has none yet, and return it.
///
/// With `explicit`, that directory is used as is. Otherwise a directory for
/// `label` (or the program name) is created under the configured
/// experiments directory, or under the working directory in dev mode.
pub fn createdir(explicit: Option<&Path>, label: Option<&str>) -> Result<PathBuf> {
    Ok(session(explicit, label)?.path().to_path_buf())
}

fn session(explicit: Option<&Path>, label: Option<&str>) -> Result<Session> {
    let mut slot = SESSION.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(session) = slot.as_ref() {
        if explicit.is_some() || label.is_some() {
            tracing::debug!(
                dir = %session.path().display(),
                "session directory already set, ignoring arguments"
            );
        }
        return Ok(session.clone());
    }

    let session = match explicit {
        Some(path) => Session::open(path)?,
        None => {
            let config = load_config()?;
            let options = SessionOptions::from_config(&config, run_mode());
            let label = label.map(str::to_string).unwrap_or_else(default_label);
            Session::create(&options, &label)?
        }
    };

    *slot = Some(session.clone());
    Ok(session)
}

/// The session directory, if one was created.
pub fn getdir() -> Option<PathBuf> {
    SESSION
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .as_ref()
        .map(|s| s.path().to_path_buf())
}

fn current() -> Result<Session> {
    session(None, None)
}

/// Join `rel` onto the session directory, creating the directory first.
pub fn joinpth(rel: impl AsRef<Path>) -> Result<PathBuf> {
    Ok(createdir(None, None)?.join(rel))
}

/// Merge `data` plus `extra` into document `name` of the session.
pub fn save_to_file<T: Serialize + ?Sized>(name: &str, data: &T, extra: Table) -> Result<Table> {
    current()?.save_with(name, data, extra)
}

/// Merge into the session's `configs.toml`.
pub fn sconf<T: Serialize + ?Sized>(data: &T) -> Result<Table> {
    save_to_file(CONFIG_FILE, data, Table::new())
}

/// Merge into the session's `results.toml`.
pub fn sres<T: Serialize + ?Sized>(data: &T) -> Result<Table> {
    save_to_file(RESULTS_FILE, data, Table::new())
}

/// Record a function's arguments in the session's `configs.toml`.
pub fn record_args<T: Serialize + ?Sized>(function: &str, args: &T) -> Result<Table> {
    current()?.record_args(function, args)
}

/// Save a named state snapshot in the session directory.
pub fn save_state<T: Serialize + ?Sized>(name: &str, value: &T) -> Result<PathBuf> {
    current()?.save_state(name, value)
}

/// Load a named state snapshot from the session directory.
pub fn load_state<T: DeserializeOwned>(name: &str) -> Result<T> {
    current()?.load_state(name)
}

/// Install file (and optionally stderr) logging into the session directory.
pub fn slogs(options: &LogOptions) -> Result<()> {
    let dir = createdir(None, None)?;
    logs::install(&dir, options)
}

/// List runs of `project` under the configured experiments directory, or
/// under the working directory in dev mode.
pub fn list_project_experiments(
    project: &str,
    since: Option<NaiveDateTime>,
    before: Option<NaiveDateTime>,
) -> Result<Vec<PathBuf>> {
    let root = if is_dev_mode() {
        None
    } else {
        load_config()?.experiments_directory
    };
    list_experiments(root.as_deref(), project, since, before)
}

/// Options for [`init`].
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Initial contents of `configs.toml`.
    pub configs: Table,
    /// Install session logging with these options.
    pub logging: Option<LogOptions>,
    /// Switch to development mode before the directory is created.
    pub dev_mode: bool,
}

/// Set dev mode, logging and the initial configuration in one call.
///
/// Calling `init` is optional; every helper creates the session on demand.
pub fn init(options: InitOptions) -> Result<PathBuf> {
    if options.dev_mode {
        set_dev_mode();
    }
    if let Some(logging) = &options.logging {
        slogs(logging)?;
    }
    sconf(&options.configs)?;
    createdir(None, None)
}
