//! Global dirlog configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DirlogError, Result};
use crate::naming::normalize_label;

/// Environment variable that overrides `experiments_directory`.
pub const EXPERIMENTS_DIR_ENV: &str = "DIRLOG_EXPERIMENTS_DIRECTORY";

/// File name of the user-level config, relative to `$HOME`.
pub const GLOBAL_CONFIG_FILE: &str = ".dirlog";

/// Top-level dirlog configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirlogConfig {
    /// Root under which project directories are created.
    #[serde(default)]
    pub experiments_directory: Option<PathBuf>,
}

impl DirlogConfig {
    /// Directory holding every run of `project`.
    pub fn project_root(&self, project: &str) -> PathBuf {
        let mut root = self.experiments_directory.clone().unwrap_or_default();
        root.push(normalize_label(project));
        root
    }
}

/// Load configuration from `~/.dirlog`, falling back to defaults.
///
/// Environment variable override: `DIRLOG_EXPERIMENTS_DIRECTORY`.
pub fn load_config() -> Result<DirlogConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or the user-level file.
pub fn load_config_from(path: Option<&Path>) -> Result<DirlogConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => {
            return Err(DirlogError::io(
                p,
                std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
            ))
        }
        None => global_config_path().filter(|p| p.exists()),
    };

    let mut config = match config_path {
        Some(path) => {
            let content =
                std::fs::read_to_string(&path).map_err(|e| DirlogError::io(&path, e))?;
            toml::from_str::<DirlogConfig>(&content)
                .map_err(|source| DirlogError::Parse { path, source })?
        }
        None => DirlogConfig::default(),
    };

    if let Some(dir) = std::env::var_os(EXPERIMENTS_DIR_ENV).filter(|v| !v.is_empty()) {
        config.experiments_directory = Some(PathBuf::from(dir));
    }

    tracing::debug!(?config, "loaded dirlog config");
    Ok(config)
}

fn global_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|h| PathBuf::from(h).join(GLOBAL_CONFIG_FILE))
}
