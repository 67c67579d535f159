//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is run through
//! [`run_command`], which owns the shared lifecycle.

pub mod completions;
pub mod credentials;
pub mod dispatcher;
pub mod link;
pub mod login;
pub mod logout;

pub use dispatcher::{run_command, Command, CommandDispatcher, DEBUG_HINT};
