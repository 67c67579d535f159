//! Command lifecycle and dispatch.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait: anything that can be performed
//! - [`run_command`]: the lifecycle every command goes through
//! - [`CommandDispatcher`] for routing CLI subcommands
//!
//! The lifecycle is: turn on diagnostics if `--debug` was given, check the
//! working directory is a valid target, perform, and on failure stop any
//! spinner and turn the error into one concise message.

use std::path::PathBuf;
use std::time::Instant;

use crate::cli::args::{Cli, Commands};
use crate::cli::context::{CommandContext, Invocation};
use crate::cli::install::validate_install;
use crate::diagnostics;
use crate::error::{ErrorKind, PlatkitError, Result};
use crate::ui::{PlatkitTheme, UserInterface};

/// Hint appended to failures when diagnostics are off.
pub const DEBUG_HINT: &str = "re-run this command with `--debug` for more info";

/// Trait for command implementations.
///
/// `perform` is the only thing a command has to provide. The default
/// implementation fails so a command wired up without one is caught on
/// first use instead of silently doing nothing.
pub trait Command {
    /// The command's identity, as typed on the command line.
    fn id(&self) -> &'static str;

    /// Do the command's work.
    fn perform(&self, _ctx: &mut CommandContext<'_>) -> Result<()> {
        Err(PlatkitError::NotImplemented {
            command: self.id().to_string(),
        })
    }
}

/// Run `command` through the full lifecycle.
pub fn run_command(command: &dyn Command, ctx: &mut CommandContext<'_>) -> Result<()> {
    let debug = ctx.flags().debug;
    if debug {
        diagnostics::enable();
    }

    tracing::debug!("args are {:?}", ctx.args());
    tracing::debug!("flags are {:?}", ctx.flags());
    tracing::debug!("------------");

    let validity = validate_install(command.id(), ctx.cwd());
    if !validity.valid {
        return Err(PlatkitError::InvalidInstall {
            reason: validity.reason,
        });
    }

    let started = Instant::now();
    let outcome = command.perform(ctx);
    tracing::debug!("`{}` finished in {:?}", command.id(), started.elapsed());

    match outcome {
        Ok(()) => {
            ctx.stop_spinner(true, None);
            Ok(())
        }
        Err(err) => Err(report_failure(ctx, err, debug)),
    }
}

/// Turn a failed `perform` into the error the user sees.
fn report_failure(ctx: &mut CommandContext<'_>, err: PlatkitError, debug: bool) -> PlatkitError {
    ctx.stop_spinner(false, None);
    tracing::debug!("{:?}", err);

    if err.kind() == ErrorKind::Usage {
        return err;
    }

    let mut lines = vec![err.to_string()];
    if !debug {
        lines.push(PlatkitTheme::detect().format_dim(DEBUG_HINT));
    }

    PlatkitError::OperationFailed {
        message: lines.join("\n\n"),
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    cwd: PathBuf,
    home: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher running commands against `cwd`.
    pub fn new(cwd: PathBuf) -> Self {
        Self { cwd, home: None }
    }

    /// Use `home` instead of the user's real home directory.
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = Some(home);
        self
    }

    /// Build the command object for a parsed subcommand.
    pub fn command_for(commands: &Commands) -> Box<dyn Command> {
        match commands {
            Commands::Login(args) => Box::new(super::login::LoginCommand::new(args.clone())),
            Commands::Logout(_) => Box::new(super::logout::LogoutCommand),
            Commands::Link(args) => Box::new(super::link::LinkCommand::new(args.clone())),
            Commands::Credentials(_) => Box::new(super::credentials::CredentialsCommand),
            Commands::Completions(args) => Box::new(
                super::completions::CompletionsCommand::new(args.clone()),
            ),
        }
    }

    /// Dispatch and run a parsed command.
    pub fn dispatch(
        &self,
        cli: &Cli,
        invocation: Invocation,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        let command = Self::command_for(&cli.command);
        let mut ctx = CommandContext::new(invocation, ui, self.cwd.clone());
        if let Some(home) = &self.home {
            ctx = ctx.with_home(home.clone());
        }
        run_command(command.as_ref(), &mut ctx)
    }
}
