//! Locating the runs of a project for later aggregation.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::{DirlogError, Result};
use crate::naming::{normalize_label, TIMESTAMP_FORMAT, TIMESTAMP_LEN};

/// Parse the leading `YYYY-MM-DD-HH-MM-SS` of a run directory name.
pub fn parse_dir_timestamp(name: &str) -> Result<NaiveDateTime> {
    name.get(..TIMESTAMP_LEN)
        .and_then(|prefix| NaiveDateTime::parse_from_str(prefix, TIMESTAMP_FORMAT).ok())
        .ok_or_else(|| DirlogError::Timestamp {
            name: name.to_string(),
        })
}

/// List the run directories of `project` under `root`.
///
/// Runs are kept when their timestamp is strictly after `since` and at or
/// before `before`; each bound only applies when given, and once a bound is
/// given every entry must carry a parseable timestamp. A missing project
/// directory is reported on stderr and yields no runs. Order follows the
/// directory listing.
pub fn list_experiments(
    root: Option<&Path>,
    project: &str,
    since: Option<NaiveDateTime>,
    before: Option<NaiveDateTime>,
) -> Result<Vec<PathBuf>> {
    let mut project_dir = root.map(Path::to_path_buf).unwrap_or_default();
    project_dir.push(normalize_label(project));

    let entries = match std::fs::read_dir(&project_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            eprintln!(
                "Project experiment directory not found: {}",
                project_dir.display()
            );
            return Ok(Vec::new());
        }
        Err(e) => return Err(DirlogError::io(&project_dir, e)),
    };

    let mut experiments = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DirlogError::io(&project_dir, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        if since.is_some() || before.is_some() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let ts = parse_dir_timestamp(&name)?;
            if since.is_some_and(|s| ts <= s) || before.is_some_and(|b| ts > b) {
                continue;
            }
        }
        experiments.push(path);
    }

    tracing::debug!(
        project = %project_dir.display(),
        count = experiments.len(),
        "listed experiments"
    );
    Ok(experiments)
}
