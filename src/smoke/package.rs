//! Packaging the current build.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::SmokeConfig;
use crate::error::{PlatkitError, Result};

use super::runner::{ProcessRunner, ProcessSpec};
use super::workspace::FileGuard;

static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+").expect("version regex is valid"));

/// A packed distributable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageArtifact {
    /// File name as printed by the packaging command.
    pub filename: String,
    /// Semantic version taken from the file name.
    pub version: String,
    /// Absolute location of the artifact.
    pub path: PathBuf,
}

/// The last line of `output` that is not blank, trimmed.
pub fn last_nonblank_line(output: &str) -> Option<&str> {
    output.lines().rev().map(str::trim).find(|line| !line.is_empty())
}

/// The first `x.y.z` version in `filename`.
pub fn extract_version(filename: &str) -> Result<String> {
    VERSION_REGEX
        .find(filename)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| PlatkitError::VersionNotFound {
            filename: filename.to_string(),
        })
}

/// Pack `dir` with the configured command and locate the artifact.
///
/// The returned guard removes the artifact when dropped. It is taken as
/// soon as the artifact's name is known, so a file the tool wrote is also
/// removed when its name carries no version.
pub fn pack(
    runner: &dyn ProcessRunner,
    config: &SmokeConfig,
    dir: &Path,
) -> Result<(PackageArtifact, FileGuard)> {
    let (program, args) = config
        .pack_command
        .split_first()
        .ok_or_else(|| PlatkitError::PackagingFailed {
            message: "no pack command configured".to_string(),
        })?;
    let spec = ProcessSpec::new(program.as_str(), args).in_dir(dir);

    tracing::info!("Packing with `{}`", spec.display());
    let result = runner.run(&spec)?;
    if !result.success {
        return Err(PlatkitError::CommandFailed {
            command: spec.display(),
            code: result.exit_code,
            stdout: result.stdout,
            stderr: result.stderr,
        });
    }

    let filename = last_nonblank_line(&result.stdout)
        .ok_or_else(|| PlatkitError::PackagingFailed {
            message: format!("`{}` printed no artifact name", spec.display()),
        })?
        .to_string();
    let path = dir.join(&filename);
    let guard = FileGuard::owned(path.clone());

    let version = extract_version(&filename)?;
    if !path.is_file() {
        return Err(PlatkitError::PackagingFailed {
            message: format!("`{}` reported {} but it does not exist", spec.display(), path.display()),
        });
    }

    tracing::info!("Packed {} (version {})", filename, version);
    Ok((
        PackageArtifact {
            filename,
            version,
            path,
        },
        guard,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smoke::runner::ScriptedRunner;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn last_nonblank_line_skips_trailing_blanks() {
        let output = "npm notice\nplatkit-core-1.2.3.tgz\n\n   \n";
        assert_eq!(last_nonblank_line(output), Some("platkit-core-1.2.3.tgz"));
    }

    #[test]
    fn last_nonblank_line_of_blank_output_is_none() {
        assert_eq!(last_nonblank_line(""), None);
        assert_eq!(last_nonblank_line("\n \n\t\n"), None);
    }

    #[test]
    fn extract_version_finds_semver() {
        assert_eq!(extract_version("platkit-core-10.0.1.tgz").unwrap(), "10.0.1");
    }

    #[test]
    fn extract_version_without_version_fails() {
        let err = extract_version("platkit-core.tgz").unwrap_err();
        assert!(matches!(err, PlatkitError::VersionNotFound { .. }));
    }

    #[test]
    fn pack_locates_artifact() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("platkit-core-2.0.0.tgz"), b"tarball").unwrap();
        let runner = ScriptedRunner::new(|_| Ok(ScriptedRunner::exit(0, "notice\nplatkit-core-2.0.0.tgz\n")));

        let (artifact, guard) = pack(&runner, &SmokeConfig::default(), temp.path()).unwrap();

        assert_eq!(artifact.version, "2.0.0");
        assert_eq!(artifact.path, temp.path().join("platkit-core-2.0.0.tgz"));
        assert_eq!(guard.path(), artifact.path);
        let call = &runner.calls()[0];
        assert_eq!(call.display(), "npm pack");
        assert_eq!(call.cwd.as_deref(), Some(temp.path()));

        drop(guard);
        assert!(!artifact.path.exists());
    }

    #[test]
    fn unversioned_artifact_is_removed() {
        let temp = TempDir::new().unwrap();
        let artifact = temp.path().join("platkit-core.tgz");
        fs::write(&artifact, b"tarball").unwrap();
        let runner = ScriptedRunner::new(|_| Ok(ScriptedRunner::exit(0, "platkit-core.tgz\n")));

        let err = pack(&runner, &SmokeConfig::default(), temp.path()).unwrap_err();

        assert!(matches!(err, PlatkitError::VersionNotFound { .. }));
        assert!(!artifact.exists());
    }

    #[test]
    fn pack_failure_keeps_output() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new(|_| Ok(ScriptedRunner::exit(1, "ENOENT")));

        let err = pack(&runner, &SmokeConfig::default(), temp.path()).unwrap_err();

        match err {
            PlatkitError::CommandFailed { code, stdout, .. } => {
                assert_eq!(code, Some(1));
                assert_eq!(stdout, "ENOENT");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn pack_with_silent_tool_fails() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new(|_| Ok(ScriptedRunner::exit(0, "\n")));
        let err = pack(&runner, &SmokeConfig::default(), temp.path()).unwrap_err();
        assert!(matches!(err, PlatkitError::PackagingFailed { .. }));
    }

    #[test]
    fn pack_reporting_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new(|_| Ok(ScriptedRunner::exit(0, "platkit-core-1.0.0.tgz")));
        let err = pack(&runner, &SmokeConfig::default(), temp.path()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
