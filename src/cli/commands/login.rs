//! Login command implementation.
//!
//! The `platkit login` command stores a deploy key in the user credential
//! file.

use crate::cli::args::LoginArgs;
use crate::cli::context::CommandContext;
use crate::credentials::{user_rc_path, UserCredentials};
use crate::error::{PlatkitError, Result};

use super::dispatcher::Command;

/// The login command implementation.
pub struct LoginCommand {
    args: LoginArgs,
}

impl LoginCommand {
    /// Create a new login command.
    pub fn new(args: LoginArgs) -> Self {
        Self { args }
    }
}

impl Command for LoginCommand {
    fn id(&self) -> &'static str {
        "login"
    }

    fn perform(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let home = ctx.home()?.to_path_buf();
        let path = user_rc_path(&home);

        if path.exists()
            && !self.args.force
            && !ctx.confirm(
                "Your credentials are already set up. Overwrite them?",
                false,
            )?
        {
            ctx.log("Keeping your existing credentials.");
            return Ok(());
        }

        let deploy_key = ctx.prompt_hidden("Deploy key")?;
        let deploy_key = deploy_key.trim();
        if deploy_key.is_empty() {
            return Err(PlatkitError::OperationFailed {
                message: "A deploy key is required to log in.".to_string(),
            });
        }

        ctx.start_spinner("Saving credentials");
        UserCredentials {
            deploy_key: deploy_key.to_string(),
        }
        .save(&home)?;
        ctx.stop_spinner(true, None);

        ctx.log(&format!(
            "Your deploy key is stored in {}. Run `platkit logout` to remove it.",
            path.display()
        ));
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

    fn run(ui: &mut MockUI, home: &TempDir, force: bool) -> Result<()> {
        let mut ctx = CommandContext::new(
            Invocation::new("login"),
            ui,
            home.path().to_path_buf(),
        )
        .with_home(home.path().to_path_buf());
        run_command(&LoginCommand::new(LoginArgs { force }), &mut ctx)
    }

    #[test]
    fn login_writes_deploy_key() {
        let home = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        ui.set_prompt_response("deploy_key", "  abc123 ");

        run(&mut ui, &home, false).unwrap();

        let saved = UserCredentials::load(home.path()).unwrap().unwrap();
        assert_eq!(saved.deploy_key, "abc123");
        assert!(ui.output_text().contains(".platkitrc"));
    }

    #[test]
    fn login_keeps_existing_credentials_when_declined() {
        let home = TempDir::new().unwrap();
        fs::write(user_rc_path(home.path()), r#"{"deployKey":"old"}"#).unwrap();
        let mut ui = MockUI::new();
        ui.set_prompt_response("deploy_key", "new");

        run(&mut ui, &home, false).unwrap();

        let saved = UserCredentials::load(home.path()).unwrap().unwrap();
        assert_eq!(saved.deploy_key, "old");
        assert_eq!(
            ui.prompts_shown(),
            &["your_credentials_are_already_set_up_overwrite_them"]
        );
    }

    #[test]
    fn login_force_overwrites_without_asking() {
        let home = TempDir::new().unwrap();
        fs::write(user_rc_path(home.path()), r#"{"deployKey":"old"}"#).unwrap();
        let mut ui = MockUI::new();
        ui.set_prompt_response("deploy_key", "new");

        run(&mut ui, &home, true).unwrap();

        let saved = UserCredentials::load(home.path()).unwrap().unwrap();
        assert_eq!(saved.deploy_key, "new");
        assert_eq!(ui.prompts_shown(), &["deploy_key"]);
    }

    #[test]
    fn login_rejects_empty_key() {
        let home = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let err = run(&mut ui, &home, false).unwrap_err();

        assert!(err.to_string().contains("deploy key is required"));
        assert!(!user_rc_path(home.path()).exists());
    }
}
