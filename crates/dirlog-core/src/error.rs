//! Library error types.
//!
//! Filesystem failures keep their original `io::Error` as the source so
//! callers can still inspect the kind (permission denied, not found, ...).

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while creating, writing or reading experiment directories.
#[derive(Debug, Error)]
pub enum DirlogError {
    /// A filesystem operation failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A TOML document on disk could not be parsed.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Data could not be serialized to TOML.
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The data to persist is not a key-value mapping.
    #[error("document '{name}' must serialize to a key-value table")]
    NotATable { name: String },

    /// A directory name does not start with a `YYYY-MM-DD-HH-MM-SS` timestamp.
    #[error("'{name}' does not start with a YYYY-MM-DD-HH-MM-SS timestamp")]
    Timestamp { name: String },

    /// A state snapshot could not be encoded or decoded.
    #[error("state snapshot {}: {source}", path.display())]
    State {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A global log subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl DirlogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DirlogError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DirlogError>;
