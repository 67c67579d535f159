//! platkit - tooling for building and shipping platform integrations.
//!
//! The crate has two halves:
//!
//! - [`cli`] is the command controller: every subcommand goes through one
//!   lifecycle that handles debug output, install validation, progress
//!   spinners, output formats, and error reporting.
//! - [`smoke`] is the release smoke-test orchestrator: it packs the CLI,
//!   checks the artifact against the published version, and runs the
//!   example projects against it.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and command implementations
//! - [`config`] - Smoke-test configuration loading and validation
//! - [`credentials`] - User and project credential files
//! - [`diagnostics`] - Process-wide debug logging
//! - [`error`] - Error types and result alias
//! - [`shell`] - Child process execution
//! - [`smoke`] - Release smoke-test orchestration
//! - [`ui`] - Terminal user interface

pub mod cli;
pub mod config;
pub mod credentials;
pub mod diagnostics;
pub mod error;
pub mod shell;
pub mod smoke;
pub mod ui;

pub use error::{PlatkitError, Result};
