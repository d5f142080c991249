//! Mergeable TOML documents stored inside a session directory.
//!
//! Saving never replaces a document wholesale: new top-level keys are
//! merged over whatever is already on disk, last write wins per key.
//! There is no locking, so concurrent writers to one file can lose updates.

use std::path::Path;

use serde::Serialize;
use toml::{Table, Value};

use crate::error::{DirlogError, Result};

/// File name of the configuration document.
pub const CONFIG_FILE: &str = "configs.toml";

/// File name of the results document.
pub const RESULTS_FILE: &str = "results.toml";

/// Default file name of the run log.
pub const LOG_FILE: &str = "logs.txt";

/// Convert any serializable value into a TOML table.
///
/// Fails with [`DirlogError::NotATable`] for scalars and sequences.
pub fn to_table<T: Serialize + ?Sized>(name: &str, data: &T) -> Result<Table> {
    match Value::try_from(data)? {
        Value::Table(table) => Ok(table),
        _ => Err(DirlogError::NotATable {
            name: name.to_string(),
        }),
    }
}

/// Load a document, treating a missing file as empty.
pub fn load_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Ok(Table::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| DirlogError::io(path, e))?;
    toml::from_str(&content).map_err(|source| DirlogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge `data` over the document stored at `path` and write the result back.
///
/// Returns the merged document as written.
pub fn merge_and_save(path: &Path, data: Table) -> Result<Table> {
    let mut merged = load_table(path)?;
    merged.extend(data);

    let content = toml::to_string(&merged)?;
    std::fs::write(path, content).map_err(|e| DirlogError::io(path, e))?;

    tracing::debug!(path = %path.display(), keys = merged.len(), "saved document");
    Ok(merged)
}
