//! Verifying one example project against the packed artifact.

use std::fmt;
use std::path::Path;

use crate::config::SmokeConfig;
use crate::credentials::{ensure_project_rc, project_rc_path};
use crate::shell::CommandResult;

use super::context::{SmokeContext, SmokeEnv};
use super::package::PackageArtifact;
use super::runner::{ProcessRunner, ProcessSpec};

/// Result of one check on an example project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Exited zero.
    Passed,
    /// Exited non-zero or could not start.
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// Not run.
    Skipped { reason: String },
}

impl CheckOutcome {
    /// True for `Failed`.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    fn skipped(reason: &str) -> Self {
        Self::Skipped {
            reason: reason.to_string(),
        }
    }

    fn from_result(result: CommandResult) -> Self {
        if result.success {
            Self::Passed
        } else {
            Self::Failed {
                code: result.exit_code,
                stdout: result.stdout,
                stderr: result.stderr,
            }
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed { code: Some(code), .. } => write!(f, "failed (exit {})", code),
            Self::Failed { code: None, .. } => write!(f, "failed"),
            Self::Skipped { reason } => write!(f, "skipped ({})", reason),
        }
    }
}

/// Outcome of every check on one example project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleReport {
    /// Example project name.
    pub name: String,
    /// Dependency installation.
    pub install: CheckOutcome,
    /// The CLI's `test` command.
    pub test: CheckOutcome,
    /// The CLI's `build` command.
    pub build: CheckOutcome,
}

impl ExampleReport {
    /// No check failed.
    pub fn passed(&self) -> bool {
        !(self.install.is_failed() || self.test.is_failed() || self.build.is_failed())
    }
}

impl fmt::Display for ExampleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: install {}, test {}, build {}",
            self.name, self.install, self.test, self.build
        )
    }
}

/// Runs the checks for each example project.
pub struct ExampleVerifier<'a> {
    runner: &'a dyn ProcessRunner,
    config: &'a SmokeConfig,
    env: &'a SmokeEnv,
    artifact: &'a PackageArtifact,
}

impl<'a> ExampleVerifier<'a> {
    pub fn new(
        runner: &'a dyn ProcessRunner,
        config: &'a SmokeConfig,
        env: &'a SmokeEnv,
        artifact: &'a PackageArtifact,
    ) -> Self {
        Self {
            runner,
            config,
            env,
            artifact,
        }
    }

    /// Install commands for an example project, in order: its own
    /// dependencies, the runtime packages, then the artifact without
    /// touching the manifest.
    pub fn install_steps(&self, dir: &Path) -> Vec<ProcessSpec> {
        let pm = self.config.package_manager.as_str();
        let mut steps = vec![ProcessSpec::new(pm, &["install"]).in_dir(dir)];

        if !self.config.runtime_packages.is_empty() {
            let mut args = vec!["install".to_string()];
            args.extend(self.config.runtime_packages.iter().cloned());
            steps.push(ProcessSpec::new(pm, &args).in_dir(dir));
        }

        let artifact = self.artifact.path.to_string_lossy();
        steps.push(ProcessSpec::new(pm, &["install", "--no-save", &*artifact]).in_dir(dir));
        steps
    }

    /// Run `spec`, turning a process that cannot start into a failure.
    fn check(&self, spec: &ProcessSpec) -> CheckOutcome {
        match self.runner.run(spec) {
            Ok(result) => CheckOutcome::from_result(result),
            Err(e) => CheckOutcome::Failed {
                code: None,
                stdout: String::new(),
                stderr: e.to_string(),
            },
        }
    }

    fn install(&self, dir: &Path) -> CheckOutcome {
        for spec in self.install_steps(dir) {
            tracing::debug!("Running `{}`", spec.display());
            let outcome = self.check(&spec);
            if outcome.is_failed() {
                echo_failure(&spec.display(), &outcome);
                return outcome;
            }
        }
        CheckOutcome::Passed
    }

    /// Write the project credential file from the environment if needed.
    ///
    /// Returns whether a credential file is present afterwards. A file
    /// that cannot be written fails the example's `build` check.
    fn provision_credentials(
        &self,
        ctx: &mut SmokeContext,
        dir: &Path,
    ) -> Result<bool, CheckOutcome> {
        match ensure_project_rc(dir, self.env.app_id, self.env.app_key.as_deref()) {
            Ok(created) => {
                ctx.has_app_rc = created;
                Ok(project_rc_path(dir).is_file())
            }
            Err(e) => Err(CheckOutcome::Failed {
                code: None,
                stdout: String::new(),
                stderr: format!("Could not write {}: {}", project_rc_path(dir).display(), e),
            }),
        }
    }

    /// Verify the example project `name` at `dir`, updating `ctx` with the
    /// project's paths.
    pub fn verify(&self, ctx: &mut SmokeContext, name: &str, dir: &Path) -> ExampleReport {
        tracing::info!("Verifying example {}", name);
        ctx.work_app_dir = Some(dir.to_path_buf());
        ctx.cli_bin = None;
        ctx.has_app_rc = false;

        if !dir.is_dir() {
            let outcome = CheckOutcome::Failed {
                code: None,
                stdout: String::new(),
                stderr: format!("{} is not in the archive", dir.display()),
            };
            echo_failure("locate example", &outcome);
            return skip_after_install(name, outcome);
        }

        let install = self.install(dir);
        if install.is_failed() {
            return skip_after_install(name, install);
        }

        let credentials = self.provision_credentials(ctx, dir);

        let cli_bin = dir
            .join("node_modules")
            .join(".bin")
            .join(&self.config.cli_name);
        ctx.cli_bin = Some(cli_bin.clone());
        let cli = cli_bin.to_string_lossy().into_owned();

        let test_spec = ProcessSpec::new(cli.as_str(), &["test"]).in_dir(dir);
        let test = self.check(&test_spec);
        if test.is_failed() {
            echo_failure(&format!("{} test", name), &test);
        }

        let build = match credentials {
            Ok(true) => {
                let mut spec = ProcessSpec::new(cli.as_str(), &["build"])
                    .in_dir(dir)
                    .with_env(&self.config.skip_install_env, "1")
                    .with_clean_env();
                if let Some(path) = &self.env.path {
                    spec = spec.with_env("PATH", path);
                }
                self.check(&spec)
            }
            Ok(false) => CheckOutcome::skipped("no project credentials"),
            Err(outcome) => outcome,
        };
        if build.is_failed() {
            echo_failure(&format!("{} build", name), &build);
        }

        ExampleReport {
            name: name.to_string(),
            install: CheckOutcome::Passed,
            test,
            build,
        }
    }
}

fn skip_after_install(name: &str, install: CheckOutcome) -> ExampleReport {
    ExampleReport {
        name: name.to_string(),
        install,
        test: CheckOutcome::skipped("install failed"),
        build: CheckOutcome::skipped("install failed"),
    }
}

/// Log a failed check with everything the process printed.
fn echo_failure(what: &str, outcome: &CheckOutcome) {
    if let CheckOutcome::Failed {
        code,
        stdout,
        stderr,
    } = outcome
    {
        tracing::error!(
            "{} failed with exit code {:?}\n--- stdout ---\n{}\n--- stderr ---\n{}",
            what,
            code,
            stdout.trim_end(),
            stderr.trim_end()
        );
    }
}
