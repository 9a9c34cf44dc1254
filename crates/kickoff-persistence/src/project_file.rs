//! Project files: one `ProjectData` snapshot per JSON file.

use std::path::Path;

use kickoff_models::ProjectData;
use tracing::debug;

use crate::atomic::{atomic_write_json, read_json};
use crate::error::{PersistenceError, Result};

/// Loads a project file.
pub fn load_project(path: &Path) -> Result<ProjectData> {
    if !path.exists() {
        return Err(PersistenceError::NotFound {
            kind: "project file",
            path: path.to_path_buf(),
        });
    }
    read_json(path)
}

/// Saves a project file, replacing any existing one.
pub fn save_project(path: &Path, data: &ProjectData) -> Result<()> {
    debug!(path = %path.display(), customer = %data.customer_name, "Saving project file");
    atomic_write_json(path, data)
}

/// Writes a new project file. Fails if the file exists unless `overwrite`.
pub fn init_project(path: &Path, data: &ProjectData, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Err(PersistenceError::AlreadyExists(path.to_path_buf()));
    }
    save_project(path, data)
}
