//! Child-process seam for the smoke test.
//!
//! Every process the orchestrator starts goes through [`ProcessRunner`], so
//! the pipeline can be driven by [`SystemRunner`] in a release run and by a
//! [`ScriptedRunner`] in tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use crate::error::Result;
use crate::shell::{display_command, execute, CommandOptions, CommandResult};

/// One process to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    /// Program name or path.
    pub program: String,
    /// Arguments, passed without a shell.
    pub args: Vec<String>,
    /// Working directory.
    pub cwd: Option<PathBuf>,
    /// Extra environment variables.
    pub env: BTreeMap<String, String>,
    /// Start from an empty environment.
    pub clear_env: bool,
}

impl ProcessSpec {
    /// Run `program` with `args` in the inherited environment.
    pub fn new<S: AsRef<str>>(program: impl Into<String>, args: &[S]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.as_ref().to_string()).collect(),
            cwd: None,
            env: BTreeMap::new(),
            clear_env: false,
        }
    }

    /// Run in `dir`.
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    /// Set an environment variable.
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Drop every inherited environment variable.
    pub fn with_clean_env(mut self) -> Self {
        self.clear_env = true;
        self
    }

    /// The command line, for logs.
    pub fn display(&self) -> String {
        display_command(&self.program, &self.args)
    }
}

/// Runs child processes to completion, capturing their output.
pub trait ProcessRunner {
    /// Run `spec`. Failing to start is an error; a non-zero exit is not.
    fn run(&self, spec: &ProcessSpec) -> Result<CommandResult>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for Rc<R> {
    fn run(&self, spec: &ProcessSpec) -> Result<CommandResult> {
        (**self).run(spec)
    }
}

/// Runs real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, spec: &ProcessSpec) -> Result<CommandResult> {
        let options = CommandOptions {
            cwd: spec.cwd.clone(),
            env: spec.env.clone(),
            clear_env: spec.clear_env,
        };
        execute(&spec.program, &spec.args, &options)
    }
}

type Handler = Box<dyn Fn(&ProcessSpec) -> Result<CommandResult>>;

/// A runner that answers from a closure and records every call.
///
/// # Example
///
/// ```
/// use platkit::smoke::{ProcessRunner, ProcessSpec, ScriptedRunner};
///
/// let runner = ScriptedRunner::new(|spec| Ok(ScriptedRunner::exit(0, &spec.program)));
/// let result = runner.run(&ProcessSpec::new("echo", &["hi"])).unwrap();
/// assert!(result.success);
/// assert_eq!(runner.calls()[0].display(), "echo hi");
/// ```
pub struct ScriptedRunner {
    handler: Handler,
    calls: RefCell<Vec<ProcessSpec>>,
}

impl ScriptedRunner {
    /// Answer every call with `handler`.
    pub fn new(handler: impl Fn(&ProcessSpec) -> Result<CommandResult> + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// A finished process with exit code `code` and `stdout`.
    pub fn exit(code: i32, stdout: &str) -> CommandResult {
        if code == 0 {
            CommandResult::success(stdout.to_string(), String::new(), Duration::ZERO)
        } else {
            CommandResult::failure(Some(code), stdout.to_string(), String::new(), Duration::ZERO)
        }
    }

    /// Every spec run so far, in order.
    pub fn calls(&self) -> Vec<ProcessSpec> {
        self.calls.borrow().clone()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, spec: &ProcessSpec) -> Result<CommandResult> {
        self.calls.borrow_mut().push(spec.clone());
        (self.handler)(spec)
    }
}
