//! Link command implementation.
//!
//! The `platkit link` command ties the current integration project to a
//! platform project by writing the project credential file.

use serde_json::json;

use crate::cli::args::LinkArgs;
use crate::cli::context::CommandContext;
use crate::credentials::{project_rc_path, ProjectCredentials};
use crate::error::{PlatkitError, Result};

use super::dispatcher::Command;

/// The link command implementation.
pub struct LinkCommand {
    args: LinkArgs,
}

impl LinkCommand {
    /// Create a new link command.
    pub fn new(args: LinkArgs) -> Self {
        Self { args }
    }

    fn project_id(&self, ctx: &mut CommandContext<'_>) -> Result<u64> {
        if let Some(id) = self.args.id {
            return Ok(id);
        }
        let answer = ctx.prompt("Project id")?;
        let answer = answer.trim();
        answer.parse().map_err(|_| PlatkitError::OperationFailed {
            message: format!("Project id must be a number, got \"{}\".", answer),
        })
    }
}

impl Command for LinkCommand {
    fn id(&self) -> &'static str {
        "link"
    }

    fn perform(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let dir = ctx.cwd().to_path_buf();
        let path = project_rc_path(&dir);

        if path.exists() && !ctx.confirm("This project is already linked. Replace the link?", false)? {
            ctx.log("Leaving the existing link in place.");
            return Ok(());
        }

        let id = self.project_id(ctx)?;
        let key = ctx.prompt_hidden("Project key")?;
        let key = key.trim();
        if key.is_empty() {
            return Err(PlatkitError::OperationFailed {
                message: "A project key is required to link.".to_string(),
            });
        }

        ctx.start_spinner("Linking project");
        ProjectCredentials {
            id,
            key: key.to_string(),
        }
        .save(&dir)?;
        ctx.stop_spinner(true, None);

        ctx.log(&format!(
            "Linked to project {}. Settings are in {}.",
            id,
            path.display()
        ));
        if !ctx.prints_prose() {
            ctx.log_json(&json!({ "id": id, "path": path }))?;
        }
        Ok(())
    }
}
