//! Configuration file discovery and loading.

use crate::config::schema::SmokeConfig;
use crate::config::validator::validate;
use crate::error::{PlatkitError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PLATKIT_SMOKE_CONFIG";

/// Project-relative location of the smoke-test config.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".platkit").join("smoke.yml")
}

/// Parse YAML content into SmokeConfig.
///
/// `source_path` is only used for error reporting.
pub fn parse_config(content: &str, source_path: &Path) -> Result<SmokeConfig> {
    if content.trim().is_empty() {
        return Ok(SmokeConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| PlatkitError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<SmokeConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PlatkitError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PlatkitError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Load and validate the smoke-test config, with an optional explicit file.
///
/// An explicit file must exist. Without one, `.platkit/smoke.yml` under
/// `project_root` is used when present, and defaults otherwise.
pub fn load_smoke_config_from(project_root: &Path, explicit: Option<&Path>) -> Result<SmokeConfig> {
    let config = match explicit {
        Some(path) => load_config_file(path)?,
        None => {
            let path = project_config_path(project_root);
            if path.exists() {
                load_config_file(&path)?
            } else {
                tracing::debug!("no smoke config at {}, using defaults", path.display());
                SmokeConfig::default()
            }
        }
    };

    validate(&config)?;
    Ok(config)
}

/// Load and validate the smoke-test config for `project_root`, honouring
/// `PLATKIT_SMOKE_CONFIG`.
pub fn load_smoke_config(project_root: &Path) -> Result<SmokeConfig> {
    let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    load_smoke_config_from(project_root, explicit.as_deref())
}
