//! Configuration schema for the release smoke test.
//!
//! Every field has a default, so an empty file (or no file at all) gives
//! the standard release gate.

use serde::{Deserialize, Serialize};

/// Settings for one smoke-test run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeConfig {
    /// Name of the package being released and checked against the registry.
    pub package_name: String,

    /// Executable the example projects get under `node_modules/.bin`.
    pub cli_name: String,

    /// Package manager used to install dependencies into example projects.
    pub package_manager: String,

    /// Command that packs the current directory and prints the artifact name.
    pub pack_command: Vec<String>,

    /// Packages installed into every example project before the artifact.
    pub runtime_packages: Vec<String>,

    /// Zip snapshot of the repository holding the example projects.
    pub archive_url: String,

    /// Directory inside the snapshot that holds the example projects.
    pub examples_prefix: String,

    /// Example projects to verify, by directory name.
    pub examples: Vec<String>,

    /// Base URL of the package registry.
    pub registry_url: String,

    /// Allowed relative deviation from the published artifact size.
    pub size_tolerance: f64,

    /// Prefix for the temporary workspace directory name.
    pub temp_prefix: String,

    /// Environment flag that tells the CLI's `build` to skip installs.
    pub skip_install_env: String,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            package_name: "platkit-core".to_string(),
            cli_name: "platkit".to_string(),
            package_manager: "npm".to_string(),
            pack_command: vec!["npm".to_string(), "pack".to_string()],
            runtime_packages: vec!["platkit-cli".to_string()],
            archive_url: "https://github.com/platkit/platkit/archive/main.zip".to_string(),
            examples_prefix: "example-apps".to_string(),
            examples: vec![
                "basic-auth".to_string(),
                "create".to_string(),
                "trigger".to_string(),
            ],
            registry_url: "https://registry.npmjs.org".to_string(),
            size_tolerance: 0.3,
            temp_prefix: "platkit-".to_string(),
            skip_install_env: "SKIP_NPM_INSTALL".to_string(),
        }
    }
}

impl SmokeConfig {
    /// URL of the registry metadata document for the package.
    pub fn metadata_url(&self) -> String {
        format!(
            "{}/{}",
            self.registry_url.trim_end_matches('/'),
            self.package_name
        )
    }

    /// URL of the published artifact for `version`.
    pub fn artifact_url(&self, version: &str) -> String {
        format!(
            "{}/-/{}-{}.tgz",
            self.metadata_url(),
            self.package_name,
            version
        )
    }
}
