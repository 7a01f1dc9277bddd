//! Config file discovery.
//!
//! A project-local `tether.toml` is used when present; otherwise the
//! defaults apply.

use std::path::{Path, PathBuf};

use crate::{ConfigError, Result, TetherConfig};

/// Default config filename for project-local config.
const PROJECT_CONFIG_FILE: &str = "tether.toml";

/// Load configuration from `project_dir` (or the current directory).
///
/// A missing config file is not an error and yields the defaults.
pub fn load_config(project_dir: Option<&Path>) -> Result<TetherConfig> {
    let path = project_config_path(project_dir);
    if path.exists() {
        load_config_file(&path)
    } else {
        Ok(TetherConfig::new())
    }
}

/// Load a single config file.
pub fn load_config_file(path: &Path) -> Result<TetherConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    TetherConfig::from_toml(&contents)
}

fn project_config_path(project_dir: Option<&Path>) -> PathBuf {
    match project_dir {
        Some(dir) => dir.join(PROJECT_CONFIG_FILE),
        None => PathBuf::from(PROJECT_CONFIG_FILE),
    }
}
