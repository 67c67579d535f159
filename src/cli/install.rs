//! Install validation.
//!
//! Before a command does anything, the controller asks whether the current
//! directory is a sensible target for it. Account-level commands run
//! anywhere; project commands need an integration project with the core
//! package declared and installed.

use serde_json::Value;
use std::fs;
use std::path::Path;

/// Package every integration project depends on.
pub const CORE_PACKAGE: &str = "platkit-core";

/// Commands that do not operate on a project.
pub const STANDALONE_COMMANDS: &[&str] = &["login", "logout", "credentials", "completions"];

/// Whether a directory is a valid target for a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallValidity {
    /// True if the command may run here.
    pub valid: bool,
    /// Why not, when `valid` is false.
    pub reason: String,
}

impl InstallValidity {
    fn ok() -> Self {
        Self {
            valid: true,
            reason: String::new(),
        }
    }

    fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
        }
    }
}

/// Check whether `dir` is a valid target for the command `command_id`.
pub fn validate_install(command_id: &str, dir: &Path) -> InstallValidity {
    if STANDALONE_COMMANDS.contains(&command_id) {
        return InstallValidity::ok();
    }

    let manifest_path = dir.join("package.json");
    let manifest = match fs::read_to_string(&manifest_path) {
        Ok(content) => content,
        Err(_) => {
            return InstallValidity::invalid(format!(
                "`platkit {}` must be run inside an integration project, but {} has no package.json",
                command_id,
                dir.display()
            ))
        }
    };

    let manifest: Value = match serde_json::from_str(&manifest) {
        Ok(value) => value,
        Err(e) => {
            return InstallValidity::invalid(format!(
                "Could not read {}: {}",
                manifest_path.display(),
                e
            ))
        }
    };

    let declared = manifest
        .get("dependencies")
        .and_then(|deps| deps.get(CORE_PACKAGE))
        .is_some();
    if !declared {
        return InstallValidity::invalid(format!(
            "This project doesn't depend on {}. Add it to the dependencies in package.json.",
            CORE_PACKAGE
        ));
    }

    if !dir
        .join("node_modules")
        .join(CORE_PACKAGE)
        .join("package.json")
        .exists()
    {
        return InstallValidity::invalid(format!(
            "{} is not installed. Run `npm install` and try again.",
            CORE_PACKAGE
        ));
    }

    InstallValidity::ok()
}
