//! Credential files.
//!
//! Two small JSON files carry credentials for the integration platform:
//!
//! - a user-level file (`~/.platkitrc`) holding a deploy key, and
//! - a project-level file (`<project>/.platkitapprc`) holding the numeric
//!   project id and its key.
//!
//! The smoke test only ever writes these when they are missing, and records
//! whether it did so; a file that already existed belongs to the user and is
//! never touched.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// File name of the user-level credential file.
pub const USER_RC_FILE: &str = ".platkitrc";

/// File name of the project-level credential file.
pub const PROJECT_RC_FILE: &str = ".platkitapprc";

/// Contents of the user-level credential file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredentials {
    #[serde(rename = "deployKey")]
    pub deploy_key: String,
}

/// Contents of the project-level credential file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCredentials {
    pub id: u64,
    pub key: String,
}

/// Path of the user-level credential file under `home`.
pub fn user_rc_path(home: &Path) -> PathBuf {
    home.join(USER_RC_FILE)
}

/// Path of the project-level credential file in `project_dir`.
pub fn project_rc_path(project_dir: &Path) -> PathBuf {
    project_dir.join(PROJECT_RC_FILE)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string(value)?;
    fs::write(path, content)?;
    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

impl UserCredentials {
    /// Read the user credential file, if it exists.
    pub fn load(home: &Path) -> Result<Option<Self>> {
        read_json(&user_rc_path(home))
    }

    /// Write (or overwrite) the user credential file.
    pub fn save(&self, home: &Path) -> Result<PathBuf> {
        let path = user_rc_path(home);
        write_json(&path, self)?;
        Ok(path)
    }
}

impl ProjectCredentials {
    /// Read the project credential file, if it exists.
    pub fn load(project_dir: &Path) -> Result<Option<Self>> {
        read_json(&project_rc_path(project_dir))
    }

    /// Write (or overwrite) the project credential file.
    pub fn save(&self, project_dir: &Path) -> Result<PathBuf> {
        let path = project_rc_path(project_dir);
        write_json(&path, self)?;
        Ok(path)
    }
}

/// Write the user credential file unless one already exists.
///
/// Returns `true` only when this call created the file.
pub fn ensure_user_rc(home: &Path, deploy_key: Option<&str>) -> Result<bool> {
    let Some(deploy_key) = deploy_key else {
        return Ok(false);
    };
    let path = user_rc_path(home);
    if path.exists() {
        tracing::debug!("Keeping existing {}", path.display());
        return Ok(false);
    }
    UserCredentials {
        deploy_key: deploy_key.to_string(),
    }
    .save(home)?;
    Ok(true)
}

/// Write the project credential file unless one already exists.
///
/// Both the id and the key must be present. Returns `true` only when this
/// call created the file.
pub fn ensure_project_rc(project_dir: &Path, id: Option<u64>, key: Option<&str>) -> Result<bool> {
    let (Some(id), Some(key)) = (id, key) else {
        return Ok(false);
    };
    let path = project_rc_path(project_dir);
    if path.exists() {
        tracing::debug!("Keeping existing {}", path.display());
        return Ok(false);
    }
    ProjectCredentials {
        id,
        key: key.to_string(),
    }
    .save(project_dir)?;
    Ok(true)
}

/// Remove a credential file. Returns `false` if there was nothing to remove.
pub fn remove(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path)?;
    Ok(true)
}
