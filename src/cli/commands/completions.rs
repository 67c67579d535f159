//! Shell completions generation.
//!
//! The `platkit completions` command generates shell completion scripts.

use clap::CommandFactory;

use crate::cli::args::{Cli, CompletionsArgs};
use crate::cli::context::CommandContext;
use crate::error::Result;

use super::dispatcher::Command;

/// The completions command implementation.
pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    /// Create a new completions command.
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }
}

impl Command for CompletionsCommand {
    fn id(&self) -> &'static str {
        "completions"
    }

    fn perform(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let mut cmd = Cli::command();
        let mut buf = Vec::new();
        clap_complete::generate(self.args.shell, &mut cmd, "platkit", &mut buf);
        ctx.ui().print(String::from_utf8_lossy(&buf).trim_end());
        Ok(())
    }
}
