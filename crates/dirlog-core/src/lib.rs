//! dirlog-core — per-run experiment directories.
//!
//! Each run gets its own directory, `{root}/{project}/{timestamp}_{project}`,
//! holding mergeable TOML documents (`configs.toml`, `results.toml`), a log
//! file and named state snapshots. Runs can later be enumerated by time
//! window and collected into a table.
//!
//! Use [`Session`] directly, or the process-wide helpers in [`global`].

pub mod aggregate;
pub mod config;
pub mod document;
pub mod enumerate;
pub mod error;
pub mod global;
pub mod logs;
pub mod naming;
pub mod session;

pub use aggregate::{collect_records, ExperimentRecord, ExperimentTable};
pub use config::{load_config, load_config_from, DirlogConfig};
pub use enumerate::list_experiments;
pub use error::{DirlogError, Result};
pub use logs::LogOptions;
pub use naming::{normalize_label, RunMode};
pub use session::{Session, SessionOptions};
