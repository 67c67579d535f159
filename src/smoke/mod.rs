//! Release smoke test.
//!
//! [`SmokeTest::run`] packs the current build, checks its size against the
//! published baseline, and verifies every configured example project
//! against it. Stages run strictly in order:
//!
//! 1. Provision the user credential file from `DEPLOY_KEY`
//! 2. Pack the project
//! 3. Create a temporary workspace
//! 4. Download the repository snapshot
//! 5. Extract the example projects
//! 6. Compare the artifact size with the published one
//! 7. Install and exercise each example project
//!
//! A failure in stages 1-6 aborts the run. Example projects are checked
//! independently and their failures are collected in the [`SmokeReport`].
//! The workspace, the artifact, and a credential file this run wrote are
//! removed however the run ends.

pub mod archive;
pub mod context;
pub mod examples;
pub mod package;
pub mod registry;
pub mod runner;
pub mod workspace;

use std::fmt;
use std::fs;
use std::path::PathBuf;

use reqwest::blocking::Client;

use crate::config::SmokeConfig;
use crate::credentials::{ensure_user_rc, user_rc_path};
use crate::error::{PlatkitError, Result};

pub use archive::{download_archive, extract_examples, ARCHIVE_FILE};
pub use context::{SmokeContext, SmokeEnv};
pub use examples::{CheckOutcome, ExampleReport, ExampleVerifier};
pub use package::{extract_version, last_nonblank_line, pack, PackageArtifact};
pub use registry::{check_size, RegistryClient};
pub use runner::{ProcessRunner, ProcessSpec, ScriptedRunner, SystemRunner};
pub use workspace::{FileGuard, TempWorkspace};

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct SmokeReport {
    /// The packed artifact (already removed from disk).
    pub artifact: PackageArtifact,
    /// Size of the packed artifact in bytes.
    pub size: u64,
    /// Latest published version.
    pub baseline_version: String,
    /// Size of the latest published artifact in bytes.
    pub baseline_size: u64,
    /// One report per example project, in configured order.
    pub examples: Vec<ExampleReport>,
}

impl SmokeReport {
    /// Names of example projects with a failed check.
    pub fn failed_examples(&self) -> Vec<&str> {
        self.examples
            .iter()
            .filter(|e| !e.passed())
            .map(|e| e.name.as_str())
            .collect()
    }

    /// The report, or `ExamplesFailed` if any example project failed.
    pub fn into_result(self) -> Result<Self> {
        let failed = self.failed_examples();
        if failed.is_empty() {
            return Ok(self);
        }
        Err(PlatkitError::ExamplesFailed {
            names: failed.into_iter().map(String::from).collect(),
        })
    }
}

impl fmt::Display for SmokeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} is {} bytes (published {} is {} bytes)",
            self.artifact.filename, self.size, self.baseline_version, self.baseline_size
        )?;
        for example in &self.examples {
            writeln!(f, "  {}", example)?;
        }
        Ok(())
    }
}

/// One smoke-test run.
pub struct SmokeTest {
    config: SmokeConfig,
    env: SmokeEnv,
    runner: Box<dyn ProcessRunner>,
    client: Client,
    project_dir: PathBuf,
    home: Option<PathBuf>,
    temp_base: PathBuf,
}

impl SmokeTest {
    /// A run of `project_dir` with real processes, the process environment,
    /// and the system temp directory.
    ///
    /// A relative `project_dir` is resolved against the current directory,
    /// since the artifact path is later used from inside each example.
    pub fn new(config: SmokeConfig, project_dir: PathBuf) -> Result<Self> {
        let project_dir = std::path::absolute(&project_dir)?;
        let client = Client::builder()
            .user_agent(concat!("platkit/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            config,
            env: SmokeEnv::from_env(),
            runner: Box::new(SystemRunner),
            client,
            project_dir,
            home: dirs::home_dir(),
            temp_base: std::env::temp_dir(),
        })
    }

    /// Run processes through `runner`.
    pub fn with_runner(mut self, runner: Box<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Use `env` instead of the process environment.
    pub fn with_env(mut self, env: SmokeEnv) -> Self {
        self.env = env;
        self
    }

    /// Look for the user credential file under `home`.
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = Some(home);
        self
    }

    /// Create the workspace under `base`.
    pub fn with_temp_base(mut self, base: PathBuf) -> Self {
        self.temp_base = base;
        self
    }

    /// Run every stage and report per-example results.
    ///
    /// Returns `Err` when a stage before the example checks fails. Example
    /// failures are in the report; see [`SmokeReport::into_result`].
    pub fn run(&self) -> Result<SmokeReport> {
        let mut ctx = SmokeContext::default();
        let config = &self.config;

        ctx.has_rc = match (self.home.as_deref(), self.env.deploy_key.as_deref()) {
            (Some(home), key) => ensure_user_rc(home, key)?,
            (None, Some(_)) => {
                return Err(PlatkitError::Usage {
                    message: "Could not determine your home directory".to_string(),
                })
            }
            (None, None) => false,
        };
        let _rc = self
            .home
            .as_deref()
            .map(|home| FileGuard::new(user_rc_path(home), ctx.has_rc));
        if ctx.has_rc {
            tracing::info!("Wrote a user credential file for this run");
        }

        let (artifact, _artifact_guard) = pack(self.runner.as_ref(), config, &self.project_dir)?;
        ctx.package = Some(artifact.clone());

        let workspace = TempWorkspace::create(&self.temp_base, &config.temp_prefix)?;
        ctx.work_repo_dir = Some(workspace.path().to_path_buf());

        let zip = download_archive(&self.client, &config.archive_url, workspace.path())?;
        extract_examples(&zip, workspace.path(), &config.examples_prefix)?;

        let registry = RegistryClient::new(self.client.clone(), config);
        let (baseline_version, baseline_size) = registry.baseline()?;
        let size = fs::metadata(&artifact.path)?.len();
        check_size(size, baseline_size, config.size_tolerance)?;
        tracing::info!("Package size {} bytes is within bounds", size);

        let examples_root = workspace.path().join(&config.examples_prefix);
        let verifier = ExampleVerifier::new(self.runner.as_ref(), config, &self.env, &artifact);
        let mut examples = Vec::with_capacity(config.examples.len());
        for name in &config.examples {
            let report = verifier.verify(&mut ctx, name, &examples_root.join(name));
            tracing::info!("{}", report);
            examples.push(report);
        }

        Ok(SmokeReport {
            artifact,
            size,
            baseline_version,
            baseline_size,
            examples,
        })
    }
}
