//! Native data-directory resolution.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Environment variable that overrides the resolved data directory.
pub const DATA_DIR_ENV: &str = "OVERLAY_DATA_DIR";

const APP_STATE_DIR: &str = "app_state";
const PREFS_DIR: &str = "prefs";

/// Directory layout under one data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the platform data directory, honoring [`DATA_DIR_ENV`].
    ///
    /// # Errors
    ///
    /// Returns an error when no home directory can be determined and no override is set.
    pub fn resolve() -> Result<Self, String> {
        resolve_with(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn app_state_dir(&self) -> PathBuf {
        self.root.join(APP_STATE_DIR)
    }

    pub fn prefs_dir(&self) -> PathBuf {
        self.root.join(PREFS_DIR)
    }
}

fn resolve_with(override_dir: Option<PathBuf>) -> Result<DataPaths, String> {
    if let Some(dir) = override_dir.filter(|dir| !dir.as_os_str().is_empty()) {
        tracing::debug!(root = %dir.display(), env = DATA_DIR_ENV, "data dir overridden");
        return Ok(DataPaths::from_root(dir));
    }
    let dirs = ProjectDirs::from("org", "overlay", "overlay")
        .ok_or_else(|| "failed to resolve app data dir: no home directory".to_string())?;
    Ok(DataPaths::from_root(dirs.data_dir()))
}
