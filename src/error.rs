//! Error types for platkit operations.
//!
//! This module defines [`PlatkitError`], the primary error type used by both
//! the command controller and the smoke-test orchestrator, and a [`Result`]
//! type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! Every error belongs to one [`ErrorKind`]:
//!
//! - `Usage` errors stop a command before any work happens (bad flags, an
//!   invalid install target, an unimplemented command).
//! - `Operation` errors come out of a command's `perform` step and are
//!   reported once, with an optional `--debug` hint.
//! - `Orchestration` errors abort a smoke-test run.
//!
//! The binary maps a kind to an exit code with [`PlatkitError::exit_code`].

use std::path::PathBuf;
use thiserror::Error;

/// Broad classification used by the top-level error handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad invocation or environment; nothing was attempted.
    Usage,
    /// A command's own logic failed.
    Operation,
    /// A smoke-test stage failed.
    Orchestration,
}

/// Core error type for platkit operations.
#[derive(Debug, Error)]
pub enum PlatkitError {
    /// Command-line flags or arguments could not be parsed.
    #[error("{message}")]
    Usage { message: String },

    /// A command was dispatched without a `perform` implementation.
    #[error("the \"{command}\" command does not implement perform")]
    NotImplemented { command: String },

    /// The working directory is not a valid target for the command.
    #[error("{reason}")]
    InvalidInstall { reason: String },

    /// Tabular output was requested with a format that has no formatter.
    #[error("invalid table format: {format}")]
    InvalidFormat { format: String },

    /// A command's `perform` step failed. The message is already formatted
    /// for display.
    #[error("{message}")]
    OperationFailed { message: String },

    /// A configuration file named explicitly does not exist.
    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A child process exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// The packaging command did not report an artifact.
    #[error("Packaging failed: {message}")]
    PackagingFailed { message: String },

    /// No semantic version could be found in the artifact filename.
    #[error("No version found in package filename: {filename}")]
    VersionNotFound { filename: String },

    /// The new artifact's size is outside the allowed band around the baseline.
    #[error(
        "Package size {size} bytes is outside {lower}..={upper} (baseline {baseline} bytes)"
    )]
    SizeRegression {
        size: u64,
        baseline: u64,
        lower: u64,
        upper: u64,
    },

    /// A remote service answered with an unusable response.
    #[error("Unexpected response from {url}: {message}")]
    BadResponse { url: String, message: String },

    /// An archive entry would be written outside the extraction root.
    #[error("Refusing to extract {entry}: path escapes the workspace")]
    UnsafeArchivePath { entry: String },

    /// One or more example projects failed verification.
    #[error("Example projects failed: {}", .names.join(", "))]
    ExamplesFailed { names: Vec<String> },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Zip archive error.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlatkitError {
    /// Classify this error for top-level reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Usage { .. }
            | Self::NotImplemented { .. }
            | Self::InvalidInstall { .. }
            | Self::InvalidFormat { .. }
            | Self::ConfigNotFound { .. }
            | Self::ConfigParseError { .. }
            | Self::ConfigValidationError { .. } => ErrorKind::Usage,
            Self::CommandFailed { .. }
            | Self::PackagingFailed { .. }
            | Self::VersionNotFound { .. }
            | Self::SizeRegression { .. }
            | Self::BadResponse { .. }
            | Self::UnsafeArchivePath { .. }
            | Self::ExamplesFailed { .. }
            | Self::Archive(_) => ErrorKind::Orchestration,
            Self::OperationFailed { .. }
            | Self::Http(_)
            | Self::Json(_)
            | Self::Io(_)
            | Self::Other(_) => ErrorKind::Operation,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::Usage => 2,
            ErrorKind::Operation | ErrorKind::Orchestration => 1,
        }
    }
}

/// Result type alias for platkit operations.
pub type Result<T> = std::result::Result<T, PlatkitError>;
