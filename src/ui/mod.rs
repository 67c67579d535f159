//! User interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//! - Output formatters, prompts, spinners, and tables
//!
//! Data (tables, JSON) goes to stdout; prompts, spinners, and errors go to
//! stderr so machine-readable output can be piped.
//!
//! # Example
//!
//! ```
//! use platkit::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.print("hello");
//! assert_eq!(ui.output(), &["hello"]);
//! ```

pub mod format;
pub mod mock;
pub mod non_interactive;
pub mod prompts;
pub mod spinner;
pub mod table;
pub mod terminal;
pub mod theme;

pub use format::{is_strict_data, Formatter, FORMATS, STRICT_DATA_FORMATS};
pub use mock::{MockSpinner, MockUI, SpinnerStatus};
pub use non_interactive::NonInteractiveUI;
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use table::Table;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, PlatkitTheme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Write a line of output to stdout, unconditionally.
    fn print(&mut self, text: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a prompt and get user input.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);
}

/// A prompt to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (used for env overrides and mocks).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// The type of prompt.
    pub prompt_type: PromptType,
    /// Default value if user just presses enter.
    pub default: Option<String>,
}

impl Prompt {
    /// Build a prompt whose key is derived from the question.
    pub fn new(question: &str, prompt_type: PromptType) -> Self {
        Self {
            key: prompt_key(question),
            question: question.to_string(),
            prompt_type,
            default: None,
        }
    }

    /// Set the default answer.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Derive a stable key from a question: lowercase words joined by `_`.
///
/// `"Deploy key?"` becomes `deploy_key`.
pub fn prompt_key(question: &str) -> String {
    question
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// The type of prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptType {
    /// Free-form text input.
    Input,
    /// Text input with the answer masked.
    Password,
    /// Yes/no confirmation.
    Confirm,
}

/// Result of a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    /// Boolean result from confirm.
    Bool(bool),
    /// String result from input or password.
    String(String),
}

impl PromptResult {
    /// Get as string.
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
        }
    }

    /// Get as bool if this is a Bool result.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Interpret a textual answer to a yes/no question.
pub(crate) fn parse_bool_answer(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}
