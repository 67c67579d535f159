//! Command-line interface for platkit.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`context`] - What a running command can see and do
//! - [`install`] - Checks that a directory is a valid command target
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;
pub mod context;
pub mod install;

use std::ffi::OsString;

use clap::{CommandFactory, FromArgMatches};

pub use args::{Cli, Commands};
pub use commands::{run_command, Command, CommandDispatcher};
pub use context::{CommandContext, Flags, Invocation};
pub use install::{validate_install, InstallValidity};

/// Parse `argv` into the typed CLI and the generic invocation commands see.
pub fn parse_from<I, T>(argv: I) -> Result<(Cli, Invocation), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut root = Cli::command();
    let matches = root.try_get_matches_from_mut(argv)?;
    let cli = Cli::from_arg_matches(&matches)?;

    let id = cli.command.id();
    let invocation = match (root.find_subcommand(id), matches.subcommand_matches(id)) {
        (Some(schema), Some(sub)) => Invocation::from_matches(id, schema, sub, cli.debug),
        _ => Invocation::new(id).with_debug(cli.debug),
    };

    Ok((cli, invocation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_collects_flags_and_positionals() {
        let (cli, invocation) =
            parse_from(["platkit", "link", "42", "--format", "json", "--debug"]).unwrap();

        assert!(cli.debug);
        assert_eq!(invocation.id, "link");
        assert_eq!(invocation.args, vec!["42".to_string()]);
        assert_eq!(invocation.flags.format.as_deref(), Some("json"));
        assert!(invocation.flags.debug);
    }

    #[test]
    fn parse_applies_format_default() {
        let (_, invocation) = parse_from(["platkit", "credentials"]).unwrap();
        assert_eq!(invocation.flags.format.as_deref(), Some("table"));
        assert!(invocation.args.is_empty());
    }

    #[test]
    fn parse_without_format_flag_leaves_format_unset() {
        let (_, invocation) = parse_from(["platkit", "logout"]).unwrap();
        assert_eq!(invocation.flags.format, None);
    }

    #[test]
    fn parse_errors_are_usage_errors() {
        let err = parse_from(["platkit", "link", "nope"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
