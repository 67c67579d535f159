//! Logout command implementation.
//!
//! The `platkit logout` command removes the user credential file.

use crate::cli::context::CommandContext;
use crate::credentials::{self, user_rc_path};
use crate::error::Result;

use super::dispatcher::Command;

/// The logout command implementation.
pub struct LogoutCommand;

impl Command for LogoutCommand {
    fn id(&self) -> &'static str {
        "logout"
    }

    fn perform(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let path = user_rc_path(ctx.home()?);

        ctx.start_spinner("Removing credentials");
        let removed = credentials::remove(&path)?;
        ctx.stop_spinner(true, None);

        if removed {
            ctx.log(&format!("Removed {}.", path.display()));
        } else {
            ctx.log("You are not logged in; nothing to remove.");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::run_command;
    use crate::cli::context::Invocation;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn run(ui: &mut MockUI, home: &TempDir) -> Result<()> {
        let mut ctx = CommandContext::new(Invocation::new("logout"), ui, home.path().to_path_buf())
            .with_home(home.path().to_path_buf());
        run_command(&LogoutCommand, &mut ctx)
    }

    #[test]
    fn logout_removes_credentials() {
        let home = TempDir::new().unwrap();
        fs::write(user_rc_path(home.path()), r#"{"deployKey":"k"}"#).unwrap();
        let mut ui = MockUI::new();

        run(&mut ui, &home).unwrap();

        assert!(!user_rc_path(home.path()).exists());
        assert!(ui.output_text().starts_with("Removed"));
    }

    #[test]
    fn logout_without_credentials_is_not_an_error() {
        let home = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        run(&mut ui, &home).unwrap();

        assert!(ui.output_text().contains("not logged in"));
    }
}
