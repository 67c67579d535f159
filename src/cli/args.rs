//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::ui::FORMATS;

/// platkit - build and link integrations for the platform.
#[derive(Debug, Parser)]
#[command(name = "platkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show extra debugging output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Save a deploy key to your user credential file
    Login(LoginArgs),

    /// Remove your user credential file
    Logout(LogoutArgs),

    /// Link the current project to a platform project
    Link(LinkArgs),

    /// List the credential files platkit can see
    Credentials(CredentialsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Commands {
    /// The command's identity, as typed on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Logout(_) => "logout",
            Self::Link(_) => "link",
            Self::Credentials(_) => "credentials",
            Self::Completions(_) => "completions",
        }
    }
}

/// Arguments for the `login` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LoginArgs {
    /// Overwrite existing credentials without asking
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `logout` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LogoutArgs {}

/// Arguments for the `link` command.
#[derive(Debug, Clone, clap::Args)]
pub struct LinkArgs {
    /// Numeric id of the platform project (asked for when omitted)
    pub id: Option<u64>,

    /// Output format
    #[arg(long, default_value = "plain", value_parser = FORMATS.to_vec())]
    pub format: String,
}

/// Arguments for the `credentials` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CredentialsArgs {
    /// Output format
    #[arg(long, default_value = "table", value_parser = FORMATS.to_vec())]
    pub format: String,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
