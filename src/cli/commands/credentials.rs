//! Credentials command implementation.
//!
//! The `platkit credentials` command lists the credential files platkit
//! would use from the current directory.

use serde_json::{json, Value};

use crate::cli::context::CommandContext;
use crate::credentials::{project_rc_path, user_rc_path, ProjectCredentials, UserCredentials};
use crate::error::Result;

use super::dispatcher::Command;

const HEADERS: &[(&str, &str)] = &[("Kind", "kind"), ("Path", "path"), ("Detail", "detail")];

const EMPTY_MESSAGE: &str = "No credentials found. Run `platkit login` to add some.";

/// The credentials command implementation.
pub struct CredentialsCommand;

/// Show only the last four characters of a secret.
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let visible: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("****{}", visible)
}

impl Command for CredentialsCommand {
    fn id(&self) -> &'static str {
        "credentials"
    }

    fn perform(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let mut rows: Vec<Value> = Vec::new();

        let home = ctx.home()?.to_path_buf();
        if let Some(user) = UserCredentials::load(&home)? {
            rows.push(json!({
                "kind": "user",
                "path": user_rc_path(&home),
                "detail": format!("deploy key {}", mask(&user.deploy_key)),
            }));
        }

        let cwd = ctx.cwd().to_path_buf();
        if let Some(project) = ProjectCredentials::load(&cwd)? {
            rows.push(json!({
                "kind": "project",
                "path": project_rc_path(&cwd),
                "detail": format!("project {}", project.id),
            }));
        }

        ctx.log_table(&rows, HEADERS, EMPTY_MESSAGE, false)
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

    fn run(ui: &mut MockUI, home: &TempDir, cwd: &TempDir, format: &str) -> Result<()> {
        let mut ctx = CommandContext::new(
            Invocation::new("credentials").with_format(format),
            ui,
            cwd.path().to_path_buf(),
        )
        .with_home(home.path().to_path_buf());
        run_command(&CredentialsCommand, &mut ctx)
    }

    #[test]
    fn mask_keeps_last_four() {
        assert_eq!(mask("abcdefgh"), "****efgh");
        assert_eq!(mask("ab"), "****ab");
    }

    #[test]
    fn no_credentials_prints_empty_message() {
        let (home, cwd) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let mut ui = MockUI::new();

        run(&mut ui, &home, &cwd, "table").unwrap();

        assert_eq!(ui.output(), &[EMPTY_MESSAGE]);
    }

    #[test]
    fn no_credentials_in_json_prints_empty_list() {
        let (home, cwd) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let mut ui = MockUI::new();

        run(&mut ui, &home, &cwd, "json").unwrap();

        assert_eq!(ui.output(), &["[]"]);
    }

    #[test]
    fn lists_user_and_project_credentials() {
        let (home, cwd) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        fs::write(user_rc_path(home.path()), r#"{"deployKey":"0123456789"}"#).unwrap();
        fs::write(project_rc_path(cwd.path()), r#"{"id":5,"key":"k"}"#).unwrap();
        let mut ui = MockUI::new();

        run(&mut ui, &home, &cwd, "table").unwrap();

        let text = ui.output_text();
        assert!(text.contains("deploy key ****6789"));
        assert!(text.contains("project 5"));
        assert!(!text.contains("0123456789"));
    }

    #[test]
    fn json_rows_are_parseable() {
        let (home, cwd) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        fs::write(user_rc_path(home.path()), r#"{"deployKey":"0123456789"}"#).unwrap();
        let mut ui = MockUI::new();

        run(&mut ui, &home, &cwd, "json").unwrap();

        let rows: Vec<Value> = serde_json::from_str(&ui.output_text()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["kind"], "user");
    }
}
