//! The session directory of one experiment run.
//!
//! A [`Session`] is created once per run and handed to whatever needs to
//! write into the run's directory. The process-wide facade in
//! [`crate::global`] wraps a single `Session` for callers that prefer free
//! functions.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::Serialize;
use toml::Table;

use crate::config::DirlogConfig;
use crate::document::{self, CONFIG_FILE, RESULTS_FILE};
use crate::error::{DirlogError, Result};
use crate::naming::{candidate_path, resolve_collision, RunId, RunMode};

/// Where and how new session directories are created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Root directory for all projects (current directory when `None`).
    pub base_dir: Option<PathBuf>,
    /// Naming mode.
    pub mode: RunMode,
}

impl SessionOptions {
    /// Options rooted at the configured experiments directory.
    ///
    /// Dev runs ignore the configured root and stay relative to the working
    /// directory.
    pub fn from_config(config: &DirlogConfig, mode: RunMode) -> Self {
        let base_dir = match mode {
            RunMode::Normal => config.experiments_directory.clone(),
            RunMode::Dev => None,
        };
        Self { base_dir, mode }
    }
}

/// A created experiment directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    dir: PathBuf,
}

impl Session {
    /// Create a new session directory for `label` using the current local time.
    pub fn create(options: &SessionOptions, label: &str) -> Result<Self> {
        Self::create_at(options, label, Local::now().naive_local())
    }

    /// Create a new session directory for `label` as if the time were `now`.
    ///
    /// In normal mode an existing directory is never reused; a `_2`, `_3`, ...
    /// suffix is appended instead. In dev mode the fixed directory is reused.
    pub fn create_at(options: &SessionOptions, label: &str, now: NaiveDateTime) -> Result<Self> {
        let run_id = RunId::for_mode(options.mode, now);
        let candidate = candidate_path(options.base_dir.as_deref(), label, run_id);
        let dir = match options.mode {
            RunMode::Normal => resolve_collision(&candidate),
            RunMode::Dev => candidate,
        };

        std::fs::create_dir_all(&dir).map_err(|e| DirlogError::io(&dir, e))?;
        tracing::info!(dir = %dir.display(), mode = ?options.mode, "created session directory");
        Ok(Self { dir })
    }

    /// Use an explicit directory, creating it if needed.
    ///
    /// No normalization or collision handling is applied.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let dir = path.into();
        std::fs::create_dir_all(&dir).map_err(|e| DirlogError::io(&dir, e))?;
        tracing::info!(dir = %dir.display(), "opened session directory");
        Ok(Self { dir })
    }

    /// The session directory.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Join a relative path onto the session directory.
    pub fn join(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.dir.join(rel)
    }

    /// Merge `data` into the document `name` inside the session directory.
    pub fn save<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> Result<Table> {
        self.save_with(name, data, Table::new())
    }

    /// Like [`Session::save`], with `extra` fields taking precedence over `data`.
    pub fn save_with<T: Serialize + ?Sized>(
        &self,
        name: &str,
        data: &T,
        extra: Table,
    ) -> Result<Table> {
        let mut table = document::to_table(name, data)?;
        table.extend(extra);
        document::merge_and_save(&self.join(name), table)
    }

    /// Merge into `configs.toml`.
    pub fn save_config<T: Serialize + ?Sized>(&self, data: &T) -> Result<Table> {
        self.save(CONFIG_FILE, data)
    }

    /// Merge into `results.toml`.
    pub fn save_results<T: Serialize + ?Sized>(&self, data: &T) -> Result<Table> {
        self.save(RESULTS_FILE, data)
    }

    /// Read a document back; missing documents are empty.
    pub fn load_document(&self, name: &str) -> Result<Table> {
        document::load_table(&self.join(name))
    }

    /// Record the arguments a function was called with under its name in
    /// `configs.toml`.
    pub fn record_args<T: Serialize + ?Sized>(&self, function: &str, args: &T) -> Result<Table> {
        let value = toml::Value::try_from(args)?;
        let mut entry = Table::new();
        entry.insert(function.to_string(), value);
        self.save(CONFIG_FILE, &entry)
    }

    /// Write a named state snapshot as `{name}.json`.
    pub fn save_state<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<PathBuf> {
        let path = self.state_path(name);
        let json = serde_json::to_vec_pretty(value).map_err(|source| DirlogError::State {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, json).map_err(|e| DirlogError::io(&path, e))?;
        Ok(path)
    }

    /// Load a state snapshot written by [`Session::save_state`].
    pub fn load_state<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.state_path(name);
        let bytes = std::fs::read(&path).map_err(|e| DirlogError::io(&path, e))?;
        serde_json::from_slice(&bytes).map_err(|source| DirlogError::State { path, source })
    }

    fn state_path(&self, name: &str) -> PathBuf {
        self.join(format!("{name}.json"))
    }
}
