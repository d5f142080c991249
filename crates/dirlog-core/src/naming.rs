//! Experiment label normalization and directory naming.
//!
//! A session directory lives at
//! `{base}/{normalized_label}/{run_id}_{label}[_{n}]`, where the run id is a
//! local timestamp in normal mode or the literal `dev` in development mode,
//! and `label` is the label as given minus path separators.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

/// Timestamp layout used for run ids and parsed back by the enumerator.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Length in bytes of a rendered [`TIMESTAMP_FORMAT`].
pub const TIMESTAMP_LEN: usize = 19;

/// Label used when none is given and the program name is unavailable.
pub const DEFAULT_LABEL: &str = "untitled";

/// Token used as the run id in development mode.
pub const DEV_RUN_ID: &str = "dev";

/// How session directories are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Timestamped directories with collision suffixes.
    #[default]
    Normal,
    /// A fixed `dev_` directory, reused across runs.
    Dev,
}

/// The leading part of a session directory name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunId {
    Timestamp(NaiveDateTime),
    Dev,
}

impl RunId {
    /// Run id for `mode` at time `now`.
    pub fn for_mode(mode: RunMode, now: NaiveDateTime) -> Self {
        match mode {
            RunMode::Normal => RunId::Timestamp(now),
            RunMode::Dev => RunId::Dev,
        }
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunId::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
            RunId::Dev => f.write_str(DEV_RUN_ID),
        }
    }
}

/// Normalize a free-form label into a project directory name.
///
/// Whitespace runs are first collapsed to `-`, then every character outside
/// `[A-Za-z0-9_]` is stripped, the hyphens included: `My Project` becomes
/// `MyProject`. Falls back to [`DEFAULT_LABEL`] when nothing is left.
pub fn normalize_label(label: &str) -> String {
    let collapsed = collapse_whitespace(label);
    let out: String = collapsed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    if out.is_empty() {
        return DEFAULT_LABEL.to_string();
    }
    out
}

fn collapse_whitespace(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_whitespace = false;
    for c in label.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('-');
            }
            in_whitespace = true;
        } else {
            in_whitespace = false;
            out.push(c);
        }
    }
    out
}

/// The label as used in a run directory name: unchanged except that path
/// separators are removed.
pub fn leaf_label(label: &str) -> String {
    label.chars().filter(|c| !matches!(c, '/' | '\\')).collect()
}

/// Name of the program that is running, used as the default label.
pub fn default_label() -> String {
    std::env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_LABEL.to_string())
}

/// Directory name of a single run: `{run_id}_{label}`.
pub fn leaf_name(run_id: RunId, label: &str) -> String {
    format!("{run_id}_{}", leaf_label(label))
}

/// Full candidate path for a run, before collision resolution.
pub fn candidate_path(base: Option<&Path>, label: &str, run_id: RunId) -> PathBuf {
    let mut path = base.map(Path::to_path_buf).unwrap_or_default();
    path.push(normalize_label(label));
    path.push(leaf_name(run_id, label));
    path
}

/// Return `path` if nothing exists there yet, otherwise the first free
/// `{path}_2`, `{path}_3`, ...
///
/// The check is not atomic with the subsequent directory creation.
pub fn resolve_collision(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let mut n = 2u32;
    loop {
        let mut name = path.as_os_str().to_os_string();
        name.push(format!("_{n}"));
        let candidate = PathBuf::from(name);
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}
