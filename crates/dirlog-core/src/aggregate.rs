//! Collecting the documents of many runs into one table.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use toml::{Table, Value};

use crate::document::{load_table, CONFIG_FILE, RESULTS_FILE};
use crate::error::{DirlogError, Result};

/// Column holding the run directory in every record.
pub const PATH_COLUMN: &str = "experiment_path";

/// Configuration and results of one run, flattened into a single mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentRecord {
    pub path: PathBuf,
    pub fields: Table,
}

/// Load the configuration and results documents of each run.
///
/// Results override configuration keys of the same name. A run whose
/// documents cannot be decoded is reported on stdout and skipped.
pub fn collect_records<P: AsRef<Path>>(experiments: &[P]) -> Result<Vec<ExperimentRecord>> {
    let mut records = Vec::with_capacity(experiments.len());

    for dir in experiments {
        let dir = dir.as_ref();
        match load_record(dir) {
            Ok(record) => records.push(record),
            Err(DirlogError::Parse { .. }) => {
                println!("Error decoding file in {}", dir.display());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(records)
}

fn load_record(dir: &Path) -> Result<ExperimentRecord> {
    let mut fields = load_table(&dir.join(CONFIG_FILE))?;
    fields.extend(load_table(&dir.join(RESULTS_FILE))?);
    fields.insert(
        PATH_COLUMN.to_string(),
        Value::String(dir.display().to_string()),
    );
    Ok(ExperimentRecord {
        path: dir.to_path_buf(),
        fields,
    })
}

/// Rows of records aligned on a common set of columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperimentTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<Value>>>,
}

impl ExperimentTable {
    /// Align records on `experiment_path` followed by every other key, sorted.
    pub fn from_records(records: &[ExperimentRecord]) -> Self {
        let keys: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| r.fields.keys().map(String::as_str))
            .filter(|k| *k != PATH_COLUMN)
            .collect();

        let columns: Vec<String> = std::iter::once(PATH_COLUMN)
            .chain(keys)
            .map(str::to_string)
            .collect();

        let rows = records
            .iter()
            .map(|r| columns.iter().map(|c| r.fields.get(c).cloned()).collect())
            .collect();

        Self { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows rendered as display strings; missing cells are empty.
    pub fn string_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| render_cell(cell.as_ref())).collect())
            .collect()
    }

    /// Write the table as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> std::result::Result<(), csv::Error> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(&self.columns)?;
        for row in self.string_rows() {
            out.write_record(&row)?;
        }
        out.flush()?;
        Ok(())
    }
}

fn render_cell(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
