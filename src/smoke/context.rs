//! State shared across the stages of one smoke-test run.

use std::path::PathBuf;

use super::package::PackageArtifact;

/// Deploy credential for the user credential file.
pub const DEPLOY_KEY_ENV: &str = "DEPLOY_KEY";
/// Project id for the project credential file.
pub const APP_ID_ENV: &str = "TEST_APP_ID";
/// Project key for the project credential file.
pub const APP_KEY_ENV: &str = "TEST_APP_KEY";

/// Environment the smoke test reads, captured once at start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmokeEnv {
    /// `DEPLOY_KEY`
    pub deploy_key: Option<String>,
    /// `TEST_APP_ID`
    pub app_id: Option<u64>,
    /// `TEST_APP_KEY`
    pub app_key: Option<String>,
    /// `PATH`, forwarded to the otherwise empty `build` environment.
    pub path: Option<String>,
}

impl SmokeEnv {
    /// Read from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let app_id = get(APP_ID_ENV).and_then(|raw| match raw.trim().parse() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!("Ignoring {}: {:?} is not a number", APP_ID_ENV, raw);
                None
            }
        });

        Self {
            deploy_key: get(DEPLOY_KEY_ENV),
            app_id,
            app_key: get(APP_KEY_ENV),
            path: lookup("PATH"),
        }
    }

    /// Both project credential values are present.
    pub fn has_app_credentials(&self) -> bool {
        self.app_id.is_some() && self.app_key.is_some()
    }
}

/// The long-lived aggregate of a run, filled in as stages complete.
#[derive(Debug, Clone, Default)]
pub struct SmokeContext {
    /// The packed artifact.
    pub package: Option<PackageArtifact>,
    /// Temporary workspace holding the extracted examples.
    pub work_repo_dir: Option<PathBuf>,
    /// Example project currently being verified.
    pub work_app_dir: Option<PathBuf>,
    /// CLI executable installed into the current example project.
    pub cli_bin: Option<PathBuf>,
    /// This run wrote the user credential file.
    pub has_rc: bool,
    /// This run wrote the current example project's credential file.
    pub has_app_rc: bool,
}
